use serde::Serialize;

/// Body of the `/health` probe.
#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
}

impl Health {
    pub fn ok() -> Self {
        Self { status: "ok", version: env!("CARGO_PKG_VERSION") }
    }
}

/// Body returned by the HTTP layer for every non-2xx response.
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

/// Body returned for acknowledgements that carry no record.
#[derive(Serialize, Debug)]
pub struct MessageBody {
    pub message: &'static str,
}
