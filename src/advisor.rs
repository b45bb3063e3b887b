//! Build advisor
//!
//! Canned build summary and keyword replies shown next to the builder.

use crate::builder::Selection;
use crate::types::PartCategory;

/// Multi-line summary of the current build
pub fn build_summary(selection: &Selection) -> String {
    let Some(cpu) = selection.get(PartCategory::Cpu) else {
        return "Select your CPU to begin. I will summarize compatibility and avoid bottlenecks."
            .to_string();
    };

    let named = |category: PartCategory| selection.get(category).map(|i| i.name.as_str());

    let mut lines = vec![format!(
        "Build Summary: {} ({})",
        cpu.name,
        cpu.socket.as_deref().unwrap_or("unknown socket")
    )];
    lines.push(match named(PartCategory::Motherboard) {
        Some(name) => format!("• Motherboard: {name} (socket match)"),
        None => "• Motherboard: not selected yet (compatible boards are filtered).".to_string(),
    });
    for (category, label) in [
        (PartCategory::Ram, "RAM"),
        (PartCategory::Gpu, "GPU"),
        (PartCategory::Psu, "PSU"),
    ] {
        lines.push(match named(category) {
            Some(name) => format!("• {label}: {name}"),
            None => format!("• {label}: not selected yet."),
        });
    }
    lines.push(
        "Advice: This build is filtered step-by-step to prevent compatibility mistakes."
            .to_string(),
    );
    lines.join("\n")
}

/// Reply to a free-text question about the build. Empty questions get none.
pub fn answer(question: &str, selection: &Selection) -> Option<String> {
    let q = question.trim().to_lowercase();
    if q.is_empty() {
        return None;
    }

    if q.contains("socket") {
        let socket = selection.cpu_socket().unwrap_or("not selected");
        return Some(format!(
            "Your CPU socket is {socket}.\nMotherboard must match the same socket."
        ));
    }

    if q.contains("bottleneck") {
        return Some(
            [
                "To avoid bottleneck:",
                "• 1080p high-FPS → CPU matters more.",
                "• 1440p/4K → GPU matters more.",
                "Tell me your resolution + games/software for a perfect balance.",
            ]
            .join("\n"),
        );
    }

    let name_or = |category: PartCategory, fallback: &'static str| {
        selection
            .get(category)
            .map(|i| i.name.clone())
            .unwrap_or_else(|| fallback.to_string())
    };
    Some(format!(
        "Based on your current build ({}, {}, {}):\n\
         • Tell me your target use (gaming/editing/AI) + resolution + budget.\n\
         • I will recommend the best balance and avoid bottlenecks.",
        name_or(PartCategory::Cpu, "your CPU"),
        name_or(PartCategory::Motherboard, "your motherboard"),
        name_or(PartCategory::Gpu, "your GPU"),
    ))
}
