//! Post model: schema-less documents created straight from request bodies

use bson::{Bson, Document};
use serde_json::Value;

use common::error::{DatabaseError, DatabaseResult};

/// A post is any JSON object the client submits; no fields are enforced
pub type Post = Document;

/// Convert a request body into a post document
///
/// Only JSON objects are accepted since a document needs named fields.
pub fn post_from_json(body: Value) -> DatabaseResult<Post> {
    if !body.is_object() {
        return Err(DatabaseError::Serialization(
            "Post body must be a JSON object".to_string(),
        ));
    }

    Ok(bson::to_document(&body)?)
}

/// Render a stored post as relaxed extended JSON
pub fn post_to_json(post: Post) -> Value {
    Bson::Document(post).into_relaxed_extjson()
}
