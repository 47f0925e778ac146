pub mod engrave;
