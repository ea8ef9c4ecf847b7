pub mod append_query_request;
pub mod append_query_route;
pub mod recent_window_route;
