mod forwarding;
mod health;
mod routing;
