//! Mess operations

mod types;

use crate::error::Error;
use crate::fetch::{segment, PageRequest, PageableResponse, Transport};
use crate::user::{ImageUploaded, UserProfile};

pub use types::*;

/// Search radius used when none is given, in kilometres
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 5.0;

/// Client for messes and their owners
pub struct MessClient<'a> {
    transport: &'a Transport,
}

impl<'a> MessClient<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Get a mess by its owner's email
    pub async fn get_by_email(&self, email: &str) -> Result<Mess, Error> {
        self.transport
            .get(&format!("/mess/getByEmail/{}", segment(email)))
            .execute()
            .await
    }

    /// Get a mess by id
    pub async fn get_by_id(&self, id: &str) -> Result<Mess, Error> {
        self.transport
            .get(&format!("/mess/getById/{}", segment(id)))
            .execute()
            .await
    }

    pub async fn list(&self) -> Result<Vec<Mess>, Error> {
        self.transport.get("/mess/getAll").execute().await
    }

    /// Messes within `radius_km` of a point, nearest first
    pub async fn nearby(&self, latitude: f64, longitude: f64, radius_km: Option<f64>) -> Result<Vec<Mess>, Error> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::validation(format!(
                "invalid coordinates {}, {}",
                latitude, longitude
            )));
        }

        self.transport
            .get("/mess/getNearby")
            .query("latitude", latitude)
            .query("longitude", longitude)
            .query("radius", radius_km.unwrap_or(DEFAULT_NEARBY_RADIUS_KM))
            .execute()
            .await
    }

    /// Update the mess owned by `email`
    pub async fn update(&self, email: &str, mess: &Mess) -> Result<Mess, Error> {
        self.transport
            .put(&format!("/mess/update/{}", segment(email)))
            .json(mess)?
            .execute()
            .await
    }

    /// Members of a mess, a page at a time
    ///
    /// The backend looks the mess up by its owner's email here, not its id.
    pub async fn members(&self, mess_email: &str, page: &PageRequest) -> Result<PageableResponse<UserProfile>, Error> {
        self.transport
            .get(&format!("/mess/getUsers/{}", segment(mess_email)))
            .page(page)
            .execute()
            .await
    }

    /// Names of the gallery images of a mess
    pub async fn images(&self, email: &str) -> Result<Vec<String>, Error> {
        self.transport
            .get(&format!("/mess/images/{}", segment(email)))
            .execute()
            .await
    }

    /// Add images to the gallery of the mess owned by `email`
    ///
    /// `files` pairs each file name with its bytes.
    pub async fn upload_images(&self, email: &str, files: Vec<(String, Vec<u8>)>) -> Result<ImageUploaded, Error> {
        if files.is_empty() {
            return Err(Error::validation("select at least one image"));
        }

        self.transport
            .post(&format!("/mess/images/{}", segment(email)))
            .files("images", files)
            .execute()
            .await
    }

    /// URL serving one gallery image
    pub fn image_url(&self, image_name: &str) -> String {
        self.transport.url(&format!("/mess/image/{}", segment(image_name)))
    }

    /// URL serving the mess profile picture
    pub fn profile_image_url(&self, email: &str) -> String {
        self.transport.url(&format!("/mess/profile/{}", segment(email)))
    }

    pub async fn upload_profile_image(
        &self,
        email: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ImageUploaded, Error> {
        self.transport
            .post(&format!("/mess/profile/{}", segment(email)))
            .file("image", file_name, bytes)
            .execute()
            .await
    }
}
