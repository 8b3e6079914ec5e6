mod common;
mod risk;
mod routing;
mod service;
