use reqwest::StatusCode;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

const NOT_FOUND: &str = "Receta no encontrada";

pub const CONNECTION_ERROR: &str = "Error de conexión. Verifique su conexión a internet.";

/// The backend operation a response belongs to. Picks the default error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    fn default_message(&self) -> &'static str {
        match self {
            Operation::List => "Error al obtener recetas",
            Operation::Get => "Error al obtener receta",
            Operation::Create => "Error al crear receta",
            Operation::Update => "Error al actualizar receta",
            Operation::Delete => "Error al eliminar receta",
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Http { status: StatusCode, message: String },
    /// The request never got an answer.
    #[error("Error de conexión. Verifique su conexión a internet.")]
    Connection(#[source] reqwest::Error),
    /// The request could not be built, e.g. a bad base URL or MIME type.
    #[error("No se pudo preparar la solicitud: {0}")]
    Request(#[source] reqwest::Error),
    /// A success response whose body is not what we expected.
    #[error("Respuesta inesperada del servidor")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Build the error for a non-success response.
    ///
    /// A JSON body contributes its `message` or `error` field. Otherwise the
    /// text falls back to a status specific message. A JSON body without
    /// either field still reads as not found on a 404.
    pub fn from_response(operation: Operation, status: StatusCode, body: &str) -> Self {
        let message = match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => ["message", "error"]
                .iter()
                .find_map(|key| {
                    value
                        .get(key)
                        .and_then(|v| v.as_str())
                        .filter(|s| !s.is_empty())
                })
                .map(String::from)
                .unwrap_or_else(|| match status {
                    StatusCode::NOT_FOUND => NOT_FOUND.to_string(),
                    _ => operation.default_message().to_string(),
                }),
            Err(_) => match status {
                StatusCode::BAD_REQUEST => "Datos inválidos o incompletos".to_string(),
                StatusCode::NOT_FOUND => NOT_FOUND.to_string(),
                StatusCode::INTERNAL_SERVER_ERROR => {
                    format!("Error interno del servidor. Response: {body}")
                }
                _ => format!(
                    "Error {}: {}. Response: {body}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            },
        };
        ApiError::Http { status, message }
    }

    /// Classify a failure from `reqwest` while sending or reading a response.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ApiError::Request(err)
        } else {
            ApiError::Connection(err)
        }
    }

    /// The text a view shows to the user.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}
