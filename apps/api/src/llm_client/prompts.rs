// Prompt fragments shared by every caller of the LLM client.
// Task-specific prompts live next to their callers (see matching/prompts.rs).

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_INSTRUCTION: &str = "Always respond with valid JSON only. \
    No additional text or formatting. \
    Do NOT use markdown code fences.";
