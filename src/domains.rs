pub mod raster;
pub mod shapes;
pub mod text;
