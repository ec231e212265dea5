pub mod cmap;
