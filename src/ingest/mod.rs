pub mod csv;
pub mod edge_list;
pub mod synthetic;
