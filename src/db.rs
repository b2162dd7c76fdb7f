use crate::config::DatabaseConfig;
use crate::error::ApiError;
use crate::models::movie::RATING_FIELD;
use crate::models::user::FavoritesUpdate;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    options::{ClientOptions, FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Client, Collection,
};
use tracing::{error, info};

const MOVIES_COLLECTION: &str = "movies";
const USERS_COLLECTION: &str = "users";

/// Repository layer holding the shared MongoDB client.
/// The driver client is cheap to clone and maintains its own connection
/// pool, so one `Database` is built at startup and passed through state.
#[derive(Clone)]
pub struct Database {
    database: mongodb::Database,
    movies: Collection<Document>,
    users: Collection<Document>,
}

impl Database {
    /// Builds the client from the configured connection URI. The driver
    /// connects lazily; call [`Database::ping`] to verify reachability.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, ApiError> {
        let uri = config.connection_uri();
        let mut options = ClientOptions::parse(&uri).await.map_err(|e| {
            error!("Failed to parse MongoDB connection URI: {}", e);
            ApiError::Database(format!("Invalid connection URI: {}", e))
        })?;
        options.app_name = Some("movie-rest-api".to_string());

        let client = Client::with_options(options).map_err(|e| {
            error!("Failed to build MongoDB client: {}", e);
            ApiError::Database(format!("Client construction failed: {}", e))
        })?;

        let database = client.database(&config.database);
        let movies = database.collection::<Document>(MOVIES_COLLECTION);
        let users = database.collection::<Document>(USERS_COLLECTION);

        Ok(Database {
            database,
            movies,
            users,
        })
    }

    /// Round-trips a `ping` command to confirm the server is reachable.
    /// Used at startup and nowhere else; request handlers rely on the
    /// driver's own server selection.
    pub async fn ping(&self) -> Result<(), ApiError> {
        self.database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                error!("Database ping failed: {}", e);
                ApiError::from(e)
            })?;

        info!("Database ping successful");
        Ok(())
    }

    // Movie operations

    pub async fn get_all_movies(&self) -> Result<Vec<Document>, ApiError> {
        let cursor = self.movies.find(None, None).await.map_err(ApiError::from)?;
        let movies = cursor.try_collect().await.map_err(ApiError::from)?;
        Ok(movies)
    }

    pub async fn get_movie_by_id(&self, movie_id: &str) -> Result<Document, ApiError> {
        let oid = parse_object_id(movie_id, "movie")?;

        let movie = self
            .movies
            .find_one(doc! { "_id": oid }, None)
            .await
            .map_err(ApiError::from)?;

        movie.ok_or_else(|| ApiError::NotFound(format!("Movie with id {}", movie_id)))
    }

    /// Top-rated movies, sorted by the rating field descending.
    pub async fn get_featured_movies(&self, limit: i64) -> Result<Vec<Document>, ApiError> {
        let options = FindOptions::builder()
            .sort(doc! { RATING_FIELD: -1 })
            .limit(limit)
            .build();

        let cursor = self
            .movies
            .find(None, options)
            .await
            .map_err(ApiError::from)?;
        let movies = cursor.try_collect().await.map_err(ApiError::from)?;
        Ok(movies)
    }

    /// Inserts the request body verbatim as a new movie document.
    /// Only shape is checked (must be a JSON object); fields are free-form.
    pub async fn create_movie(&self, body: serde_json::Value) -> Result<String, ApiError> {
        let document = to_document(&body)?;

        let result = self
            .movies
            .insert_one(document, None)
            .await
            .map_err(ApiError::from)?;

        let inserted_id = bson_id_to_string(&result.inserted_id);
        info!("Created movie with id: {}", inserted_id);
        Ok(inserted_id)
    }

    /// Merges the given fields into an existing movie with `$set` and
    /// returns the post-update document.
    pub async fn update_movie(
        &self,
        movie_id: &str,
        patch: serde_json::Value,
    ) -> Result<Document, ApiError> {
        let oid = parse_object_id(movie_id, "movie")?;
        let fields = to_document(&patch)?;

        // An empty $set is a server-side error; reject it up front
        if fields.is_empty() {
            return Err(ApiError::validation("Update body must contain at least one field"));
        }

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .movies
            .find_one_and_update(doc! { "_id": oid }, doc! { "$set": fields }, options)
            .await
            .map_err(ApiError::from)?;

        match updated {
            Some(movie) => {
                info!("Updated movie with id: {}", movie_id);
                Ok(movie)
            }
            None => Err(ApiError::NotFound(format!("Movie with id {}", movie_id))),
        }
    }

    pub async fn delete_movie(&self, movie_id: &str) -> Result<u64, ApiError> {
        let oid = parse_object_id(movie_id, "movie")?;

        let result = self
            .movies
            .delete_one(doc! { "_id": oid }, None)
            .await
            .map_err(ApiError::from)?;

        if result.deleted_count == 0 {
            Err(ApiError::NotFound(format!("Movie with id {}", movie_id)))
        } else {
            info!("Deleted movie with id: {}", movie_id);
            Ok(result.deleted_count)
        }
    }

    // User operations

    pub async fn find_user_by_email(&self, email: &str) -> Result<Document, ApiError> {
        let user = self
            .users
            .find_one(doc! { "email": email }, None)
            .await
            .map_err(ApiError::from)?;

        user.ok_or_else(|| ApiError::NotFound(format!("User with email {}", email)))
    }

    pub async fn create_user(&self, body: serde_json::Value) -> Result<String, ApiError> {
        let document = to_document(&body)?;

        let result = self
            .users
            .insert_one(document, None)
            .await
            .map_err(ApiError::from)?;

        let inserted_id = bson_id_to_string(&result.inserted_id);
        info!("Created user with id: {}", inserted_id);
        Ok(inserted_id)
    }

    // Favorites operations
    //
    // Favorites are stored on the user document as an array of movie-id hex
    // strings. Both identifiers are parsed before any store access so a
    // malformed id never reaches the server.

    /// Resolves a user's favorites list to full movie documents.
    /// Entries that do not parse as object ids are skipped, matching the
    /// loosely-typed storage format.
    pub async fn get_favorite_movies(&self, user_id: &str) -> Result<Vec<Document>, ApiError> {
        let oid = parse_object_id(user_id, "user")?;

        let user = self
            .users
            .find_one(doc! { "_id": oid }, None)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::NotFound(format!("User with id {}", user_id)))?;

        let favorite_ids = favorite_object_ids(&user);
        if favorite_ids.is_empty() {
            return Ok(Vec::new());
        }

        let cursor = self
            .movies
            .find(doc! { "_id": { "$in": favorite_ids } }, None)
            .await
            .map_err(ApiError::from)?;
        let movies = cursor.try_collect().await.map_err(ApiError::from)?;
        Ok(movies)
    }

    /// Adds a movie id to the user's favorites with `$addToSet`, so adding
    /// the same movie twice leaves exactly one occurrence.
    pub async fn add_favorite(
        &self,
        user_id: &str,
        movie_id: &str,
    ) -> Result<FavoritesUpdate, ApiError> {
        let user_oid = parse_object_id(user_id, "user")?;
        let movie_oid = parse_object_id(movie_id, "movie")?;

        let result = self
            .users
            .update_one(
                doc! { "_id": user_oid },
                doc! { "$addToSet": { "favorites": movie_oid.to_hex() } },
                None,
            )
            .await
            .map_err(ApiError::from)?;

        if result.matched_count == 0 {
            return Err(ApiError::NotFound(format!("User with id {}", user_id)));
        }

        info!(
            "Added favorite {} for user {} (modified: {})",
            movie_id, user_id, result.modified_count
        );
        Ok(FavoritesUpdate {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    /// Removes a movie id from the user's favorites with `$pull`.
    /// A matched user with nothing pulled means the favorite was absent,
    /// which is reported as not found rather than silently succeeding.
    pub async fn remove_favorite(
        &self,
        user_id: &str,
        movie_id: &str,
    ) -> Result<FavoritesUpdate, ApiError> {
        let user_oid = parse_object_id(user_id, "user")?;
        let movie_oid = parse_object_id(movie_id, "movie")?;

        let result = self
            .users
            .update_one(
                doc! { "_id": user_oid },
                doc! { "$pull": { "favorites": movie_oid.to_hex() } },
                None,
            )
            .await
            .map_err(ApiError::from)?;

        if result.matched_count == 0 {
            return Err(ApiError::NotFound(format!("User with id {}", user_id)));
        }

        if result.modified_count == 0 {
            return Err(ApiError::NotFound(format!(
                "Favorite {} for user {}",
                movie_id, user_id
            )));
        }

        info!("Removed favorite {} for user {}", movie_id, user_id);
        Ok(FavoritesUpdate {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }
}

/// Parses an identifier from a URL segment, rejecting malformed input
/// before any store access.
fn parse_object_id(raw: &str, what: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw)
        .map_err(|_| ApiError::Validation(format!("Invalid {} id format: {}", what, raw)))
}

/// Converts a request body into a BSON document.
/// Anything other than a JSON object is a validation error.
fn to_document(value: &serde_json::Value) -> Result<Document, ApiError> {
    if !value.is_object() {
        return Err(ApiError::validation("Request body must be a JSON object"));
    }

    mongodb::bson::to_document(value)
        .map_err(|e| ApiError::Validation(format!("Invalid document payload: {}", e)))
}

/// Renders an inserted-id `Bson` for the response body.
/// Object ids become plain hex; client-supplied ids of other types fall
/// back to their display form.
fn bson_id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Extracts the parseable favorite movie ids from a user document.
/// The favorites array is loosely typed; non-string and malformed entries
/// are skipped rather than treated as errors.
fn favorite_object_ids(user: &Document) -> Vec<ObjectId> {
    user.get_array("favorites")
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry.as_str())
                .filter_map(|raw| ObjectId::parse_str(raw).ok())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_object_id_accepts_valid_hex() {
        let oid = parse_object_id("653f1a2b3c4d5e6f7a8b9c0d", "movie").unwrap();
        assert_eq!(oid.to_hex(), "653f1a2b3c4d5e6f7a8b9c0d");
    }

    #[test]
    fn test_parse_object_id_rejects_malformed() {
        assert!(parse_object_id("not-an-id", "movie").is_err());
        assert!(parse_object_id("", "user").is_err());
        // Right length, bad characters
        assert!(parse_object_id("zzzzzzzzzzzzzzzzzzzzzzzz", "movie").is_err());
    }

    #[test]
    fn test_to_document_accepts_objects() {
        let document = to_document(&json!({"title": "X", "movieRating": 9})).unwrap();
        assert_eq!(document.get_str("title").unwrap(), "X");
        assert_eq!(document.get_i64("movieRating").unwrap(), 9);
    }

    #[test]
    fn test_to_document_rejects_non_objects() {
        assert!(to_document(&json!([1, 2, 3])).is_err());
        assert!(to_document(&json!("just a string")).is_err());
        assert!(to_document(&json!(null)).is_err());
    }

    #[test]
    fn test_bson_id_to_string() {
        let oid = ObjectId::parse_str("653f1a2b3c4d5e6f7a8b9c0d").unwrap();
        assert_eq!(
            bson_id_to_string(&Bson::ObjectId(oid)),
            "653f1a2b3c4d5e6f7a8b9c0d"
        );
        assert_eq!(
            bson_id_to_string(&Bson::String("custom-id".to_string())),
            "custom-id"
        );
    }

    #[test]
    fn test_favorite_object_ids_skips_malformed_entries() {
        let user = doc! {
            "email": "jane@example.com",
            "favorites": [
                "653f1a2b3c4d5e6f7a8b9c0d",
                "garbage",
                42,
                "653f1a2b3c4d5e6f7a8b9c0e",
            ],
        };

        let ids = favorite_object_ids(&user);
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0].to_hex(), "653f1a2b3c4d5e6f7a8b9c0d");
        assert_eq!(ids[1].to_hex(), "653f1a2b3c4d5e6f7a8b9c0e");
    }

    #[test]
    fn test_favorite_object_ids_handles_missing_array() {
        let user = doc! { "email": "jane@example.com" };
        assert!(favorite_object_ids(&user).is_empty());
    }
}
