pub mod gemini;
pub mod instructions;
