use super::Strings;

pub const STRINGS: Strings = Strings {
    btn_open_folder: "Abrir carpeta",
    btn_close: "Cerrar",
    btn_prev: "Anterior",
    btn_next: "Siguiente",
    text_images: "imágenes",
    text_empty_gallery: "No hay imágenes. Abre una carpeta para comenzar.",
    text_loading: "Cargando imagen...",
    text_image_fallback: "Imagen",
    load_failed: "No se pudo cargar la imagen",
};
