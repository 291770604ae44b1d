use fulfillment_places_client_interface::PlacesClientError;
use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum GooglePlacesError {
    /// Timeouts and refused connections; the only kind worth retrying
    #[error("Places {operation} could not reach the server: {message}")]
    NetworkError { operation: String, message: String },

    #[error("Places {operation} answered HTTP {status}: {message}")]
    ApiError { operation: String, status: StatusCode, message: String },

    /// HTTP 200 whose body carries a failure `status` such as `REQUEST_DENIED`
    #[error("Google Places rejected {operation} with status {status}: {message}")]
    RequestRejected { operation: String, status: String, message: String },

    #[error("Places {operation} returned a body that is not a search response: {message}")]
    ParseError { operation: String, message: String },

    #[error("Invalid places endpoint for {operation}: {message}")]
    UrlError { operation: String, message: String },

    #[error("Places client failure during {operation}: {message}")]
    Other { operation: String, message: String },
}

impl GooglePlacesError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, GooglePlacesError::NetworkError { .. })
    }

    /// Short, stable name of the error kind, used as a structured log field
    pub fn error_type(&self) -> &'static str {
        match self {
            GooglePlacesError::NetworkError { .. } => "network_error",
            GooglePlacesError::ApiError { .. } => "api_error",
            GooglePlacesError::RequestRejected { .. } => "request_rejected",
            GooglePlacesError::ParseError { .. } => "parse_error",
            GooglePlacesError::UrlError { .. } => "url_error",
            GooglePlacesError::Other { .. } => "other_error",
        }
    }

    /// Classifies a transport failure; status-carrying errors stay API errors
    pub fn from_reqwest_error(operation: impl Into<String>, source: reqwest::Error) -> Self {
        let operation = operation.into();

        if source.is_timeout() {
            GooglePlacesError::NetworkError { operation, message: "timed out".to_string() }
        } else if source.is_connect() {
            GooglePlacesError::NetworkError { operation, message: format!("connection refused: {source}") }
        } else if let Some(status) = source.status() {
            GooglePlacesError::ApiError { operation, status, message: source.to_string() }
        } else if source.is_decode() {
            GooglePlacesError::ParseError { operation, message: source.to_string() }
        } else {
            GooglePlacesError::NetworkError { operation, message: source.to_string() }
        }
    }

    pub fn api_error(operation: impl Into<String>, status: StatusCode, message: impl Into<String>) -> Self {
        GooglePlacesError::ApiError { operation: operation.into(), status, message: message.into() }
    }
}

impl From<GooglePlacesError> for PlacesClientError {
    fn from(value: GooglePlacesError) -> Self {
        match value {
            GooglePlacesError::NetworkError { message, .. } => PlacesClientError::Transport(message),
            GooglePlacesError::ApiError { status, message, .. }
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN =>
            {
                PlacesClientError::Unauthorized(message)
            }
            GooglePlacesError::ApiError { status, message, .. } => {
                PlacesClientError::Provider { status: status.to_string(), message }
            }
            GooglePlacesError::RequestRejected { status, message, .. } if status == "REQUEST_DENIED" => {
                PlacesClientError::Unauthorized(message)
            }
            GooglePlacesError::RequestRejected { status, message, .. } => {
                PlacesClientError::Provider { status, message }
            }
            GooglePlacesError::ParseError { message, .. } => PlacesClientError::InvalidResponse(message),
            other => PlacesClientError::Internal(Box::new(other)),
        }
    }
}
