
mod stake;
