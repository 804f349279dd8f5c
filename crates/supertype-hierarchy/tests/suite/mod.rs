mod arrays;
mod caching;
mod errors;
