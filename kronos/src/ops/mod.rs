mod data;
mod model;
mod predict;
