mod log_pane;
mod status_bar;
