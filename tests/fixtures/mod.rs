pub mod las_vegas_catalog;
