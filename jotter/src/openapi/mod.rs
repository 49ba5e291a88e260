//! OpenAPI documentation for the notes API, served at `/docs`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::api;

/// Bearer JWT scheme referenced by every authenticated path.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.security_schemes.insert(
            "BearerAuth".to_string(),
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Access token authentication. Include the token in the `Authorization` header:\n\n\
                        ```\nAuthorization: Bearer YOUR_ACCESS_TOKEN\n```",
                    ))
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Jotter API",
        description = "Personal notes: list, create and delete the notes you own."
    ),
    modifiers(&SecurityAddon),
    paths(
        api::handlers::notes::list_notes,
        api::handlers::notes::create_note,
        api::handlers::notes::delete_note,
        api::handlers::users::get_current_user,
        api::handlers::users::register,
    ),
    components(
        schemas(
            api::models::notes::NoteCreate,
            api::models::notes::NoteResponse,
            api::models::users::UserResponse,
            api::models::users::RegisterRequest,
        )
    ),
    tags(
        (name = "notes", description = "Notes owned by the authenticated user"),
        (name = "users", description = "Identity and account creation"),
    )
)]
pub struct ApiDoc;
