use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gemini Relay",
        version = "0.1.0",
        description = "Relays chat requests to a Gemini generateContent API. Fetches the machine instruction, builds the payload, calls the model and returns the first candidate."
    ),
    servers(
        (url = "http://localhost:8080", description = "Local dev")
    ),
    tags(
        (name = "relay", description = "Model relay endpoint")
    ),
    // Handlers (paths)
    paths(
        crate::routes::relay::relay,
    ),
    // Schemas used in requests/responses
    components(
        schemas(
            crate::models::relay::RelayRequest,
            crate::models::relay::MachineConfig,
            crate::models::relay::LlmSettings,
            crate::models::common::RelayOutcome
        )
    )
)]
pub struct ApiDoc;
