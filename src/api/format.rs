use uuid::Uuid;

/// Canonical URL of a newly created resource: the collection path the request
/// was made against plus the new id, prefixed with the public base URL when set.
pub fn location_for(public_base_url: Option<&str>, collection_path: &str, id: Uuid) -> String {
    let path = format!("{}/{}", collection_path.trim_end_matches('/'), id);
    match public_base_url {
        Some(base) => format!("{}{}", base.trim_end_matches('/'), path),
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_id_to_collection_path() {
        let id = Uuid::nil();
        assert_eq!(
            location_for(None, "/api/v1/products", id),
            format!("/api/v1/products/{id}")
        );
        assert_eq!(
            location_for(None, "/api/v1/products/", id),
            format!("/api/v1/products/{id}")
        );
    }

    #[test]
    fn prefixes_public_base_url() {
        let id = Uuid::nil();
        assert_eq!(
            location_for(Some("https://shop.example.com/"), "/api/v1/products", id),
            format!("https://shop.example.com/api/v1/products/{id}")
        );
    }
}
