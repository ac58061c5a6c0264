use indicatif::{style::TemplateError, ProgressBar, ProgressStyle};

/// Bar counting top-level roots processed by a collect pass.
pub fn create_collect_bar(total_roots: u64) -> Result<ProgressBar, TemplateError> {
    let progress_bar = ProgressBar::new(total_roots);

    progress_bar.set_style(ProgressStyle::default_bar().template(
        "{percent:3}% [{bar:.cyan/blue}] {msg} {pos:.yellow}/{len:.magenta} assets ({eta:.cyan})",
    )?);

    progress_bar.set_message("collecting");

    Ok(progress_bar)
}
