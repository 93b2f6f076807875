pub mod logging;
pub mod rates;
pub mod session;
pub mod gateway;

// Booking wizard: controller, cost estimator, persistence manager
pub mod booking;
