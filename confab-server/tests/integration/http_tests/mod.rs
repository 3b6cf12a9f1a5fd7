mod test_http_routes;
