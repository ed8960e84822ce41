pub mod api;
pub mod error;
pub mod fetcher;
pub mod http_client;
pub mod mock_client;

pub use api::{AutocompleteResponse, Prediction, SuggestionService, ValuationService};
pub use error::{ServiceError, ValuationError};
pub use fetcher::{SuggestionFetcher, ValuationFetcher};
pub use http_client::HttpServiceClient;
pub use mock_client::{MockSuggestionService, MockValuationService};
