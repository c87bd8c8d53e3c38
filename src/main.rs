#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod config;
mod core;
mod error;
mod i18n;
mod ui;
use app::run;

fn main() {
    run();
}
