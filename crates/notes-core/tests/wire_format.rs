//! Documents as the notes API actually sends them.

use notes_core::{
    ApiErrorBody, AuthResponse, Note, NoteUpdate, PublicNote, Role, ShareLink, UsersResponse,
};
use serde_json::json;

#[test]
fn login_response_with_mongo_style_ids() {
    let body = json!({
        "user": {
            "_id": "65f1aa00",
            "username": "ada",
            "email": "ada@example.com",
            "role": "admin",
            "avatar": null,
            "createdAt": "2024-01-05T09:00:00.000Z",
            "updatedAt": "2024-01-05T09:00:00.000Z"
        },
        "token": "eyJhbGciOi.payload.sig"
    });

    let auth: AuthResponse = serde_json::from_value(body).unwrap();
    assert_eq!(auth.user.id.as_str(), "65f1aa00");
    assert!(auth.user.is_admin());
    assert_eq!(auth.user.avatar, None);
    assert_eq!(auth.token, "eyJhbGciOi.payload.sig");
}

#[test]
fn admin_listing_tolerates_missing_roles() {
    let body = json!({
        "users": [
            {
                "id": "u-1", "username": "ada", "email": "ada@example.com",
                "createdAt": "2024-01-05T09:00:00Z", "updatedAt": "2024-01-05T09:00:00Z"
            },
            {
                "id": "u-2", "username": "root", "email": "root@example.com", "role": "superuser",
                "createdAt": "2024-01-05T09:00:00Z", "updatedAt": "2024-01-05T09:00:00Z"
            }
        ]
    });

    let response: UsersResponse = serde_json::from_value(body).unwrap();
    assert_eq!(response.users[0].role, Role::User);
    assert_eq!(response.users[1].role, Role::Unknown);
}

#[test]
fn editing_a_held_note_sends_only_mutable_fields() {
    let note: Note = serde_json::from_value(json!({
        "_id": "n-1",
        "title": "Draft",
        "content": "first pass",
        "owner": "u-1",
        "isPublic": true,
        "slug": "draft",
        "createdAt": "2024-03-01T10:00:00.000Z",
        "updatedAt": "2024-03-01T10:00:00.000Z",
        "__v": 0
    }))
    .unwrap();

    let patch = NoteUpdate::from(&note).title("Final").to_patch();
    assert_eq!(
        serde_json::to_value(&patch).unwrap(),
        json!({ "title": "Final", "content": "first pass", "isPublic": true })
    );
}

#[test]
fn public_note_listing() {
    let notes: Vec<PublicNote> = serde_json::from_value(json!([{
        "_id": "n-9",
        "title": "Hello",
        "content": "world",
        "owner": "u-1",
        "isPublic": true,
        "slug": "hello",
        "createdAt": "2024-03-01T10:00:00.000Z",
        "updatedAt": "2024-03-01T10:00:00.000Z"
    }]))
    .unwrap();

    assert_eq!(notes[0].slug, "hello");
}

#[test]
fn share_link_field_spellings() {
    for body in [
        json!({ "link": "https://n.test/ada/notes/x" }),
        json!({ "url": "https://n.test/ada/notes/x" }),
        json!({ "shareLink": "https://n.test/ada/notes/x" }),
    ] {
        let link: ShareLink = serde_json::from_value(body).unwrap();
        assert_eq!(link.link, "https://n.test/ada/notes/x");
    }
}

#[test]
fn error_bodies_in_the_wild() {
    let validation: ApiErrorBody = serde_json::from_str(
        r#"{"status":"fail","errors":[{"field":"body.email","message":"Invalid email"}]}"#,
    )
    .unwrap();
    assert_eq!(validation.errors[0].field_name(), "email");
    assert_eq!(validation.message, None);

    let business: ApiErrorBody =
        serde_json::from_str(r#"{"status":"error","message":"Note not found"}"#).unwrap();
    assert_eq!(business.message.as_deref(), Some("Note not found"));
    assert!(business.errors.is_empty());

    let empty: ApiErrorBody = serde_json::from_str("{}").unwrap();
    assert_eq!(empty, ApiErrorBody::default());
}
