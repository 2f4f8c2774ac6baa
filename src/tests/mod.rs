
mod api_sitemap_router;
