//! Fixed instruction sent with every image.

/// Asks for a single long, hyphenated, filename-safe description
pub const CAPTION_PROMPT: &str = r#"Describe this image as a filename.

RULES:
- Output ONE line and nothing else: no quotes, no explanation, no file extension
- Lowercase words separated by hyphens (-), never spaces
- Only letters a-z, digits 0-9 and hyphens
- Be long and specific: main subject, action, setting, colors, lighting, notable objects
- At most 200 characters

GOOD: "golden-retriever-puppy-chasing-red-ball-on-green-lawn-sunny-afternoon"
GOOD: "snow-covered-mountain-peaks-above-blue-alpine-lake-at-sunrise"
BAD: "image" (meaningless)
BAD: "A dog in a park" (spaces, uppercase)"#;
