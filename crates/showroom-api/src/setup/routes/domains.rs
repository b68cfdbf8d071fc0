//! Route groups, one pair per collection: routes the public website calls and
//! routes behind the admin login.

use std::sync::Arc;

use axum::routing::{delete, get, patch, post, put};
use axum::Router;

use crate::handlers::{
    auth, blogs, car_config, cars, colors, contacts, faqs, projects, static_testimonials, users,
    video_testimonials, visits,
};
use crate::state::AppState;

pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
}

pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/add-user", post(users::add_user))
        .route("/users/view-users", get(users::view_users))
        .route("/users/view-user/{id}", get(users::view_user))
}

pub fn public_car_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/cars/public/cars", get(cars::public_cars))
        .route("/cars/public/cars/{id}/click", post(cars::record_click))
}

pub fn car_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/cars/add-car", post(cars::add_car))
        .route("/cars/view-cars", get(cars::view_cars))
        .route("/cars/view-car/{id}", get(cars::view_car))
        .route("/cars/update-car/{id}", put(cars::update_car))
        .route("/cars/delete-car/{id}", delete(cars::delete_car))
}

pub fn car_config_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/config/add-car-config", post(car_config::add_car_config))
        .route("/config/view-car-configs", get(car_config::view_car_configs))
        .route("/config/view-car-config/{id}", get(car_config::view_car_config))
        .route(
            "/config/update-car-config/{id}",
            patch(car_config::update_car_config),
        )
        .route(
            "/config/delete-car-config/{id}",
            delete(car_config::delete_car_config),
        )
        .route("/config/get-makes", get(car_config::get_makes))
        .route("/config/get-models/{make_name}", get(car_config::get_models))
}

pub fn color_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/color/add-color", post(colors::add_color))
        .route("/color/view-colors", get(colors::view_colors))
        .route("/color/view-color/{id}", get(colors::view_color))
        .route("/color/update-color/{id}", patch(colors::update_color))
        .route("/color/delete-color/{id}", delete(colors::delete_color))
}

pub fn public_project_routes() -> Router<Arc<AppState>> {
    Router::new().route("/projects/public-projects", get(projects::public_projects))
}

pub fn project_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/projects/add-project", post(projects::add_project))
        .route("/projects/view-projects", get(projects::view_projects))
        .route("/projects/view-project/{id}", get(projects::view_project))
        .route("/projects/update-project/{id}", put(projects::update_project))
        .route("/projects/delete-project/{id}", delete(projects::delete_project))
        .route(
            "/projects/update-list-status/{id}",
            put(projects::update_list_status),
        )
}

pub fn public_blog_routes() -> Router<Arc<AppState>> {
    Router::new().route("/blogs/listed-blogs", get(blogs::listed_blogs))
}

pub fn blog_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/blogs/add-blog", post(blogs::add_blog))
        .route("/blogs/view-blogs", get(blogs::view_blogs))
        .route("/blogs/view-blog/{id}", get(blogs::view_blog))
        .route("/blogs/update-blog/{id}", put(blogs::update_blog))
        .route("/blogs/delete-blog/{id}", delete(blogs::delete_blog))
        .route(
            "/blogs/update-blog-list-status/{id}",
            put(blogs::update_blog_list_status),
        )
}

pub fn public_static_testimonial_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/static-testimonials/view-listed-static-testimonials",
        get(static_testimonials::listed_static_testimonials),
    )
}

pub fn static_testimonial_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/static-testimonials/add-static-testimonial",
            post(static_testimonials::add_static_testimonial),
        )
        .route(
            "/static-testimonials/view-static-testimonials",
            get(static_testimonials::view_static_testimonials),
        )
        .route(
            "/static-testimonials/view-static-testimonial/{id}",
            get(static_testimonials::view_static_testimonial),
        )
        .route(
            "/static-testimonials/update-static-testimonial/{id}",
            put(static_testimonials::update_static_testimonial),
        )
        .route(
            "/static-testimonials/delete-static-testimonial/{id}",
            delete(static_testimonials::delete_static_testimonial),
        )
        .route(
            "/static-testimonials/update-static-list-status/{id}",
            put(static_testimonials::update_static_testimonial_status),
        )
}

pub fn public_video_testimonial_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/video-testimonials/view-listed-video-testimonials",
        get(video_testimonials::listed_video_testimonials),
    )
}

pub fn video_testimonial_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/video-testimonials/add-video-testimonial",
            post(video_testimonials::add_video_testimonial),
        )
        .route(
            "/video-testimonials/view-video-testimonials",
            get(video_testimonials::view_video_testimonials),
        )
        .route(
            "/video-testimonials/view-video-testimonial/{id}",
            get(video_testimonials::view_video_testimonial),
        )
        .route(
            "/video-testimonials/update-video-testimonial/{id}",
            put(video_testimonials::update_video_testimonial),
        )
        .route(
            "/video-testimonials/delete-video-testimonial/{id}",
            delete(video_testimonials::delete_video_testimonial),
        )
        .route(
            "/video-testimonials/update-video-status/{id}",
            put(video_testimonials::update_video_testimonial_status),
        )
}

pub fn public_contact_routes() -> Router<Arc<AppState>> {
    Router::new().route("/contacts/add-contact", post(contacts::add_contact))
}

pub fn contact_routes() -> Router<Arc<AppState>> {
    Router::new().route("/contacts/view-all", get(contacts::view_contacts))
}

pub fn public_faq_routes() -> Router<Arc<AppState>> {
    Router::new().route("/faqs/listed-faqs", get(faqs::listed_faqs))
}

pub fn faq_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/faqs/add-faq", post(faqs::add_faq))
        .route("/faqs/view-faqs", get(faqs::view_faqs))
        .route("/faqs/view-faq/{id}", get(faqs::view_faq))
        .route("/faqs/update-faq/{id}", put(faqs::update_faq))
        .route("/faqs/delete-faq/{id}", delete(faqs::delete_faq))
}

pub fn public_visit_routes() -> Router<Arc<AppState>> {
    Router::new().route("/visit/track-visit", post(visits::track_visit))
}

pub fn visit_routes() -> Router<Arc<AppState>> {
    Router::new().route("/visit/stats", get(visits::visit_stats))
}
