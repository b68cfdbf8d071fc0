//! Application state and sub-states.
//!
//! Handlers receive `State<Arc<AppState>>` and reach into the sub-state they need.

use std::sync::Arc;

use axum::extract::Multipart;
use showroom_core::{AppError, Document};
use showroom_db::{
    BlogRepository, CarMakeRepository, CarRepository, ColorRepository, ContactRepository,
    FaqRepository, ProjectRepository, StaticTestimonialRepository, UserRepository,
    VideoTestimonialRepository, VisitRepository,
};
use showroom_services::CleanupQueue;
use sqlx::PgPool;

use crate::auth::jwt::JwtService;
use crate::services::{GeoLocator, MediaPipeline};
use crate::utils::upload::{read_multipart, StagedForm, UploadLimits};

/// Pool and one repository per collection
#[derive(Clone)]
pub struct DbState {
    pub pool: PgPool,
    pub users: UserRepository,
    pub cars: CarRepository,
    pub car_makes: CarMakeRepository,
    pub colors: ColorRepository,
    pub projects: ProjectRepository,
    pub blogs: BlogRepository,
    pub static_testimonials: StaticTestimonialRepository,
    pub video_testimonials: VideoTestimonialRepository,
    pub contacts: ContactRepository,
    pub faqs: FaqRepository,
    pub visits: VisitRepository,
}

impl DbState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            cars: CarRepository::new(pool.clone()),
            car_makes: CarMakeRepository::new(pool.clone()),
            colors: ColorRepository::new(pool.clone()),
            projects: ProjectRepository::new(pool.clone()),
            blogs: BlogRepository::new(pool.clone()),
            static_testimonials: StaticTestimonialRepository::new(pool.clone()),
            video_testimonials: VideoTestimonialRepository::new(pool.clone()),
            contacts: ContactRepository::new(pool.clone()),
            faqs: FaqRepository::new(pool.clone()),
            visits: VisitRepository::new(pool.clone()),
            pool,
        }
    }
}

/// Upload pipeline and staging limits
#[derive(Clone)]
pub struct MediaState {
    pub pipeline: MediaPipeline,
    pub limits: UploadLimits,
    pub max_car_images: usize,
}

impl MediaState {
    pub fn cleanup(&self) -> &CleanupQueue {
        self.pipeline.cleanup()
    }

    /// Stage a multipart body against the slots of `D`.
    pub async fn read_form<D: Document>(&self, multipart: Multipart) -> Result<StagedForm, AppError> {
        read_multipart(multipart, D::SLOTS, &self.limits, self.cleanup().clone()).await
    }

    /// Car forms allow more images than the other resources.
    pub async fn read_car_form<D: Document>(
        &self,
        multipart: Multipart,
    ) -> Result<StagedForm, AppError> {
        let limits = self.limits.clone().with_max_files(self.max_car_images);
        read_multipart(multipart, D::SLOTS, &limits, self.cleanup().clone()).await
    }
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt: JwtService,
    pub secure_cookies: bool,
}

#[derive(Clone)]
pub struct VisitState {
    pub geo: Arc<dyn GeoLocator>,
    pub cookie_max_age_days: i64,
    pub dedup_window_minutes: i64,
    pub trusted_proxy_count: usize,
}

pub struct AppState {
    pub db: DbState,
    pub media: MediaState,
    pub auth: AuthConfig,
    pub visits: VisitState,
}
