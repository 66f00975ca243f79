//! An in-memory provider for tests. Each call pops the next scripted answer;
//! once a queue runs dry the call reports an empty result.

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::{Result, anyhow};

use super::DataProvider;
use crate::model::{Slide, Style, Topic};

type Scripted<T> = std::result::Result<T, String>;

#[derive(Default)]
pub struct ScriptedProvider {
    styles: Mutex<VecDeque<Scripted<Option<Style>>>>,
    topics: Mutex<VecDeque<Scripted<Option<Topic>>>>,
    slides: Mutex<VecDeque<Scripted<Vec<Slide>>>>,
    topic_colors: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(self, answer: Scripted<Option<Style>>) -> Self {
        self.styles.lock().unwrap().push_back(answer);
        self
    }

    pub fn with_topic(self, answer: Scripted<Option<Topic>>) -> Self {
        self.topics.lock().unwrap().push_back(answer);
        self
    }

    pub fn with_slides(self, answer: Scripted<Vec<Slide>>) -> Self {
        self.slides.lock().unwrap().push_back(answer);
        self
    }

    /// Colors passed to `fetch_random_topic`, in call order.
    pub fn topic_colors(&self) -> Vec<String> {
        self.topic_colors.lock().unwrap().clone()
    }
}

fn next<T: Default>(queue: &Mutex<VecDeque<Scripted<T>>>) -> Result<T> {
    match queue.lock().unwrap().pop_front() {
        Some(answer) => answer.map_err(|e| anyhow!(e)),
        None => Ok(T::default()),
    }
}

impl DataProvider for ScriptedProvider {
    fn fetch_random_style(&self) -> Result<Option<Style>> {
        next(&self.styles)
    }

    fn fetch_random_topic(&self, color: &str) -> Result<Option<Topic>> {
        self.topic_colors.lock().unwrap().push(color.to_string());
        next(&self.topics)
    }

    fn fetch_random_slide_batch(&self) -> Result<Vec<Slide>> {
        next(&self.slides)
    }
}
