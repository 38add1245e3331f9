//! Tool routers for the wiki MCP surface.

mod pages;
