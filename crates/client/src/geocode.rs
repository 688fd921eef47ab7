use crate::client::HttpClient;
use async_trait::async_trait;
use deskhub_core::debounce::{AddressQuery, Coordinates, Geocoder};
use deskhub_core::{LookupError, TransportError};

const GEOCODE_PATH: &str = "/property/geocode";

#[async_trait]
impl Geocoder for HttpClient {
    async fn geocode(&self, query: &AddressQuery) -> Result<Coordinates, LookupError> {
        let request = self.authorize(self.http.post(self.url(GEOCODE_PATH)).json(query));
        let reply = self.send(request).await?;

        if !reply.is_success() {
            return match reply.message() {
                Some(message) => Err(LookupError::NotFound(message.to_owned())),
                None => Err(reply.transport_error().into()),
            };
        }

        reply
            .into_body()
            .and_then(|body| serde_json::from_value::<Coordinates>(body).ok())
            .ok_or_else(|| TransportError::connection("geocode response has no coordinates").into())
    }
}
