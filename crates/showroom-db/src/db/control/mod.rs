mod user;

pub use user::UserRepository;
