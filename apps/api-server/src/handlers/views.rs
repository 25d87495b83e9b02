//! Mapping from core views to wire DTOs.

use inkwell_core::domain::{Category, User};
use inkwell_core::services::{AuthorSummary, CommentView, PostView, Session};
use inkwell_shared::dto::{
    AuthResponse, AuthorResponse, CategoryResponse, CommentResponse, PostResponse, UserResponse,
};

pub fn user(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        full_name: user.full_name,
        bio: user.bio,
        profile_picture: user.profile_picture,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

pub fn session(session: Session) -> AuthResponse {
    AuthResponse {
        user: user(session.user),
        token: session.token,
        expires_in: session.expires_in,
    }
}

fn author(author: AuthorSummary) -> AuthorResponse {
    AuthorResponse {
        id: author.id,
        username: author.username,
        full_name: author.full_name,
        profile_picture: author.profile_picture,
    }
}

pub fn category(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        name: category.name,
        slug: category.slug,
        created_at: category.created_at,
    }
}

pub fn post(view: PostView) -> PostResponse {
    let post = view.post;
    PostResponse {
        id: post.id,
        title: post.title,
        slug: post.slug,
        content: post.content,
        excerpt: post.excerpt,
        featured_image: post.featured_image,
        category_id: post.category_id,
        author_id: post.author_id,
        published: post.published,
        created_at: post.created_at,
        updated_at: post.updated_at,
        author: view.author.map(author),
        category: view.category.map(category),
        likes_count: view.likes_count,
        user_liked: view.user_liked,
    }
}

pub fn posts(views: Vec<PostView>) -> Vec<PostResponse> {
    views.into_iter().map(post).collect()
}

pub fn comment(view: CommentView) -> CommentResponse {
    let comment = view.comment;
    CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        author_id: comment.author_id,
        content: comment.content,
        created_at: comment.created_at,
        author: view.author.map(author),
    }
}
