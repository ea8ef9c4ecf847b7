pub mod keyword_embedding_route;
