pub mod dlt_geometry_solver;
