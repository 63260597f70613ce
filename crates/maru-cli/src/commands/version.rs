use maru_core::TOOL_VERSION;

pub fn version() {
    println!("maru {TOOL_VERSION}");
}
