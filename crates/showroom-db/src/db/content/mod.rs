mod blog;
mod car;
mod car_make;
mod color;
mod contact;
mod faq;
mod project;
mod testimonial;
mod visit;

pub use blog::BlogRepository;
pub use car::CarRepository;
pub use car_make::CarMakeRepository;
pub use color::ColorRepository;
pub use contact::ContactRepository;
pub use faq::FaqRepository;
pub use project::ProjectRepository;
pub use testimonial::{StaticTestimonialRepository, VideoTestimonialRepository};
pub use visit::VisitRepository;
