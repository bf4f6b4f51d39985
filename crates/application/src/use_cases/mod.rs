pub mod resolve_query;
