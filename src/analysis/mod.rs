pub mod bfs;
pub mod degree;
pub mod subgraph;
