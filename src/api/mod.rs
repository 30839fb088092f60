pub mod admin;
pub mod images;
pub mod schedule;

pub use admin::{
    add_favorite, delete_image, get_settings, list_favorites, list_images, remove_favorite,
    requeue_image, update_settings,
};
pub use admin::{
    __path_add_favorite, __path_delete_image, __path_get_settings, __path_list_favorites,
    __path_list_images, __path_remove_favorite, __path_requeue_image, __path_update_settings,
};
pub use images::{current_bitmap, current_image, image_bitmap, upload_image, UploadQuery};
pub use images::{__path_current_bitmap, __path_current_image, __path_image_bitmap, __path_upload_image};
pub use schedule::{get_schedule, ScheduleResponse, __path_get_schedule};
