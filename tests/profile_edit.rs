// Tests for editing user and artist profiles.
use atelier::context::{AppContext, TestContext};
use atelier::directory::{self, Profile};
use atelier::error::{AccessError, FormError};
use atelier::model::{Artist, Role, UserProfile};
use atelier::profile::{ProfileChanges, update_profile};
use atelier::session::Session;
use atelier::source::LocalBackend;
use std::sync::Arc;

fn backend() -> (Arc<TestContext>, LocalBackend) {
    let ctx = Arc::new(TestContext::new());
    std::fs::write(
        ctx.get_users_path().unwrap(),
        r#"[{"uid": "u-mira", "name": "Mira Sato", "role": "member"}]"#,
    )
    .unwrap();
    let backend = LocalBackend::new(ctx.clone());
    let mut leon = Artist::new("ar-leon", "Leon Varga", "Printmaking");
    leon.role = Role::Member;
    backend.add_artists(vec![leon]).unwrap();
    (ctx, backend)
}

fn form_error(err: &anyhow::Error) -> Option<&FormError> {
    err.downcast_ref::<FormError>()
}

#[test]
fn test_user_edits_own_profile() {
    let (_ctx, backend) = backend();
    let mira = Session::signed_in(UserProfile::new("u-mira", "Mira Sato", Role::Member));

    let saved = update_profile(
        &backend,
        &mira,
        "u-mira",
        &ProfileChanges {
            domain: Some("Ceramics".to_string()),
            bio: Some("Wheel-thrown stoneware.".to_string()),
            graduation_year: Some(2021),
            ..Default::default()
        },
    )
    .unwrap();

    let Profile::User(user) = saved else {
        panic!("expected the users document to be edited");
    };
    assert_eq!(user.name, "Mira Sato");
    assert_eq!(user.domain, "Ceramics");
    assert_eq!(user.graduation_year, Some(2021));
}

#[tokio::test]
async fn test_artist_profile_is_the_fallback() {
    let (_ctx, backend) = backend();
    let leon = Session::signed_in(UserProfile::new("ar-leon", "Leon Varga", Role::Member));

    let changes = ProfileChanges {
        name: Some("Leon V.".to_string()),
        profile_image_url: Some("https://img.example/leon.png".to_string()),
        ..Default::default()
    };
    let saved = update_profile(&backend, &leon, "ar-leon", &changes).unwrap();
    assert!(matches!(saved, Profile::Artist(_)));

    let dir = directory::load_directory(&backend).await;
    let Some(Profile::Artist(artist)) = dir.find_profile("ar-leon") else {
        panic!("artist should still be found");
    };
    assert_eq!(artist.name, "Leon V.");
    assert_eq!(artist.image_url, "https://img.example/leon.png");
    assert_eq!(artist.domain, "Printmaking");
}

#[test]
fn test_admin_may_edit_someone_else() {
    let (_ctx, backend) = backend();
    let admin = Session::signed_in(UserProfile::new("a-ada", "Ada Okafor", Role::Admin));
    let changes = ProfileChanges {
        bio: Some("Club alumni.".to_string()),
        ..Default::default()
    };
    assert!(update_profile(&backend, &admin, "ar-leon", &changes).is_ok());
}

#[test]
fn test_members_cannot_edit_other_profiles() {
    let (_ctx, backend) = backend();
    let mira = Session::signed_in(UserProfile::new("u-mira", "Mira Sato", Role::Member));
    let changes = ProfileChanges {
        name: Some("Not Leon".to_string()),
        ..Default::default()
    };

    let err = update_profile(&backend, &mira, "ar-leon", &changes).unwrap_err();
    assert_eq!(
        form_error(&err),
        Some(&FormError::Access(AccessError::PermissionDenied))
    );
    let err = update_profile(&backend, &Session::anonymous(), "ar-leon", &changes).unwrap_err();
    assert_eq!(
        form_error(&err),
        Some(&FormError::Access(AccessError::Unauthenticated))
    );
    assert_eq!(backend.load_artists().unwrap()[0].name, "Leon Varga");
}

#[test]
fn test_unknown_profile_is_reported() {
    let (_ctx, backend) = backend();
    let admin = Session::signed_in(UserProfile::new("a-ada", "Ada Okafor", Role::Admin));
    let changes = ProfileChanges {
        bio: Some("Hello".to_string()),
        ..Default::default()
    };

    let err = update_profile(&backend, &admin, "nobody", &changes).unwrap_err();
    assert_eq!(
        form_error(&err),
        Some(&FormError::ProfileNotFound("nobody".to_string()))
    );
    assert!(err.to_string().contains("No profile document found to update"));
}

#[test]
fn test_blank_name_and_empty_changes_are_rejected() {
    let (_ctx, backend) = backend();
    let mira = Session::signed_in(UserProfile::new("u-mira", "Mira Sato", Role::Member));

    let blank = ProfileChanges {
        name: Some("   ".to_string()),
        ..Default::default()
    };
    let err = update_profile(&backend, &mira, "u-mira", &blank).unwrap_err();
    assert_eq!(form_error(&err), Some(&FormError::MissingField("name")));

    let err = update_profile(&backend, &mira, "u-mira", &ProfileChanges::default()).unwrap_err();
    assert!(matches!(form_error(&err), Some(FormError::InvalidArgument(_))));

    let err = update_profile(&backend, &mira, " ", &blank).unwrap_err();
    assert!(matches!(form_error(&err), Some(FormError::InvalidArgument(_))));
}
