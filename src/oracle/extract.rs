/// Locate the JSON object in a model reply that may wrap it in markdown
/// fences or surrounding prose.
pub fn extract_json_object(text: &str) -> Result<&str, String> {
    let cleaned = text.trim();

    // Try to extract from ```json ... ``` blocks.
    let json_str = if let Some(start) = cleaned.find("```json") {
        let after_fence = &cleaned[start + 7..];
        match after_fence.find("```") {
            Some(end) => after_fence[..end].trim(),
            None => after_fence.trim(),
        }
    } else if let Some(start) = cleaned.find("```") {
        let after_fence = &cleaned[start + 3..];
        match after_fence.find("```") {
            Some(end) => after_fence[..end].trim(),
            None => after_fence.trim(),
        }
    } else if cleaned.starts_with('{') {
        cleaned
    } else {
        // Try to find the first { and last }
        let start = cleaned.find('{').ok_or("No JSON object found")?;
        let end = cleaned.rfind('}').ok_or("No closing brace found")?;
        if end < start {
            return Err("No JSON object found".to_string());
        }
        &cleaned[start..=end]
    };

    if json_str.is_empty() {
        return Err("Empty JSON block".to_string());
    }
    Ok(json_str)
}
