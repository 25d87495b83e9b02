//! Multipart bodies for the endpoints that accept image uploads.

use actix_multipart::form::{MultipartForm, bytes::Bytes, text::Text};

use inkwell_core::ports::UploadedImage;
use inkwell_core::services::{PostInput, PostUpdate};

use crate::middleware::error::AppError;

fn text(field: Option<Text<String>>) -> Option<String> {
    field.map(Text::into_inner)
}

/// An empty file input arrives as a part with no name and no bytes.
fn image(field: &str, file: Option<Bytes>) -> Option<UploadedImage> {
    let file = file?;
    let file_name = file.file_name.unwrap_or_default();
    if file_name.is_empty() && file.data.is_empty() {
        return None;
    }

    Some(UploadedImage {
        field: field.to_string(),
        file_name,
        content_type: file
            .content_type
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_default(),
        data: file.data.to_vec(),
    })
}

fn published(field: Option<Text<String>>) -> Result<Option<bool>, AppError> {
    let Some(value) = text(field) else {
        return Ok(None);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "true" | "1" | "on" => Ok(Some(true)),
        "false" | "0" | "off" => Ok(Some(false)),
        _ => Err(AppError::BadRequest(
            "published must be true or false".to_string(),
        )),
    }
}

#[derive(MultipartForm)]
pub struct ProfileForm {
    #[multipart(rename = "fullName")]
    pub full_name: Option<Text<String>>,
    pub bio: Option<Text<String>>,
    #[multipart(rename = "profilePicture", limit = "6MiB")]
    pub profile_picture: Option<Bytes>,
}

impl ProfileForm {
    pub fn into_parts(self) -> (Option<String>, Option<String>, Option<UploadedImage>) {
        (
            text(self.full_name),
            text(self.bio),
            image("profilePicture", self.profile_picture),
        )
    }
}

/// Fields shared by post creation and update.
#[derive(MultipartForm)]
pub struct PostForm {
    pub title: Option<Text<String>>,
    pub content: Option<Text<String>>,
    pub excerpt: Option<Text<String>>,
    pub category: Option<Text<String>>,
    pub published: Option<Text<String>>,
    #[multipart(rename = "featuredImage", limit = "6MiB")]
    pub featured_image: Option<Bytes>,
}

impl PostForm {
    pub fn into_input(self) -> Result<PostInput, AppError> {
        Ok(PostInput {
            published: published(self.published)?,
            title: text(self.title).unwrap_or_default(),
            content: text(self.content).unwrap_or_default(),
            excerpt: text(self.excerpt),
            category: text(self.category),
            featured_image: image("featuredImage", self.featured_image),
        })
    }

    pub fn into_update(self) -> Result<PostUpdate, AppError> {
        Ok(PostUpdate {
            published: published(self.published)?,
            title: text(self.title),
            content: text(self.content),
            excerpt: text(self.excerpt),
            category: text(self.category),
            featured_image: image("featuredImage", self.featured_image),
        })
    }
}
