/// Renders a millisecond duration as `"<hours>h <minutes>m"`, truncating seconds.
pub fn format_duration(ms: i64) -> String {
    let ms = ms.max(0);
    let hours = ms / (1000 * 60 * 60);
    let minutes = (ms % (1000 * 60 * 60)) / (1000 * 60);
    format!("{}h {}m", hours, minutes)
}
