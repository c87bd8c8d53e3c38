use std::collections::HashMap;
use egui::TextureHandle;

/// Bounded cache keyed by image source, evicting the least recently used entry.
pub struct ImageCache<T = TextureHandle> {
    textures: HashMap<String, T>,
    max_cache_size: usize,
    access_order: Vec<String>,
}

impl<T: Clone> ImageCache<T> {
    pub fn new(max_size: usize) -> Self {
        Self {
            textures: HashMap::new(),
            max_cache_size: max_size.max(1),
            access_order: Vec::new(),
        }
    }

    pub fn get(&mut self, source: &str) -> Option<T> {
        let texture = self.textures.get(source)?.clone();
        self.touch(source);
        Some(texture)
    }

    pub fn insert(&mut self, source: String, texture: T) {
        if self.textures.contains_key(&source) {
            self.touch(&source);
            self.textures.insert(source, texture);
            return;
        }

        while self.textures.len() >= self.max_cache_size && !self.access_order.is_empty() {
            let oldest = self.access_order.remove(0);
            self.textures.remove(&oldest);
        }

        self.textures.insert(source.clone(), texture);
        self.access_order.push(source);
    }

    pub fn clear(&mut self) {
        self.textures.clear();
        self.access_order.clear();
    }

    pub fn contains(&self, source: &str) -> bool {
        self.textures.contains_key(source)
    }

    fn touch(&mut self, source: &str) {
        if let Some(pos) = self.access_order.iter().position(|p| p == source) {
            let source = self.access_order.remove(pos);
            self.access_order.push(source);
        }
    }
}
