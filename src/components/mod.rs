/// Inline SVG charts and tables for query results.
pub mod chart;
/// Canvas lineage graph of tables and relationships.
pub mod schema_graph;
