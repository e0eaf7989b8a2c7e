#[cfg(target_arch = "wasm32")]
pub fn main() {
    facegate_web::start();
}

#[cfg(not(target_arch = "wasm32"))]
pub fn main() {}
