use serde::{Deserialize, Serialize};

/// Query parameters for user lookup.
/// The email is required by the handler, not by the extractor, so a missing
/// parameter yields a descriptive validation message instead of a 422.
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub email: Option<String>,
}

/// Payload for adding a movie to a user's favorites set.
#[derive(Debug, Deserialize)]
pub struct AddFavoriteRequest {
    #[serde(rename = "movieId")]
    pub movie_id: String,
}

/// Outcome of a favorites mutation, mirroring the driver's update result.
/// `modified_count` of zero on an add means the movie was already present;
/// set semantics make that a success, not a conflict.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesUpdate {
    pub matched_count: u64,
    pub modified_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_users_query_deserialization() {
        let query: ListUsersQuery =
            serde_json::from_str(r#"{"email":"jane@example.com"}"#).expect("Failed to deserialize");
        assert_eq!(query.email, Some("jane@example.com".to_string()));

        let query: ListUsersQuery = serde_json::from_str(r#"{}"#).expect("Failed to deserialize");
        assert_eq!(query.email, None);
    }

    #[test]
    fn test_add_favorite_request_deserialization() {
        let request: AddFavoriteRequest =
            serde_json::from_str(r#"{"movieId":"653f1a2b3c4d5e6f7a8b9c0d"}"#)
                .expect("Failed to deserialize AddFavoriteRequest");
        assert_eq!(request.movie_id, "653f1a2b3c4d5e6f7a8b9c0d");
    }

    #[test]
    fn test_add_favorite_request_requires_movie_id() {
        let result: Result<AddFavoriteRequest, _> = serde_json::from_str(r#"{}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_favorites_update_serialization() {
        let update = FavoritesUpdate {
            matched_count: 1,
            modified_count: 0,
        };
        let json = serde_json::to_string(&update).expect("Failed to serialize FavoritesUpdate");
        assert_eq!(json, r#"{"matchedCount":1,"modifiedCount":0}"#);
    }
}
