use std::path::PathBuf;
use std::time::Duration;

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, RgbaImage};
use reqwest::Client as HttpClient;

use crate::error::{AppError, AppResult};

/// File name of the combined poster inside the output directory
pub const COMBINED_POSTER: &str = "posters.png";

/// Source of poster image bytes
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> AppResult<Vec<u8>>;
}

/// Downloads images over HTTP
#[derive(Clone)]
pub struct HttpImageSource {
    http_client: HttpClient,
}

impl HttpImageSource {
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self { http_client })
    }
}

#[async_trait::async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &str) -> AppResult<Vec<u8>> {
        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "image fetch returned status {}",
                response.status()
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Composes the two generated posters into one side-by-side image
///
/// A poster that cannot be fetched or decoded is replaced by the placeholder image.
pub struct PosterGallery<S> {
    source: S,
    placeholder: PathBuf,
    output_dir: PathBuf,
}

impl<S: ImageSource> PosterGallery<S> {
    pub fn new(source: S, placeholder: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            source,
            placeholder,
            output_dir,
        }
    }

    /// Fetches the first two URLs and writes them side by side as one PNG
    ///
    /// Returns the path of the written image.
    pub async fn save_pair(&self, urls: &[&str]) -> AppResult<PathBuf> {
        if urls.len() < 2 {
            return Err(AppError::InvalidInput(format!(
                "two poster URLs are needed, got {}",
                urls.len()
            )));
        }

        let left = self.load_poster(urls[0]).await?;
        let right = self.load_poster(urls[1]).await?;
        let combined = side_by_side(&left, &right);

        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(COMBINED_POSTER);
        combined.save_with_format(&path, ImageFormat::Png)?;

        tracing::info!(
            path = %path.display(),
            width = combined.width(),
            height = combined.height(),
            "Saved posters"
        );
        Ok(path)
    }

    async fn load_poster(&self, url: &str) -> AppResult<DynamicImage> {
        let decoded = match self.source.fetch(url).await {
            Ok(bytes) => image::load_from_memory(&bytes).map_err(AppError::from),
            Err(e) => Err(e),
        };

        match decoded {
            Ok(poster) => Ok(poster),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Poster unavailable; using placeholder");
                let bytes = std::fs::read(&self.placeholder)?;
                Ok(image::load_from_memory(&bytes)?)
            }
        }
    }
}

/// Places two images next to each other at the smaller of their heights
fn side_by_side(left: &DynamicImage, right: &DynamicImage) -> RgbaImage {
    let height = left.height().min(right.height()).max(1);
    let left = fit_height(left, height);
    let right = fit_height(right, height);

    let mut canvas = RgbaImage::new(left.width() + right.width(), height);
    imageops::overlay(&mut canvas, &left, 0, 0);
    imageops::overlay(&mut canvas, &right, i64::from(left.width()), 0);
    canvas
}

/// Scales to `height`, keeping the aspect ratio
fn fit_height(poster: &DynamicImage, height: u32) -> RgbaImage {
    if poster.height() == height {
        return poster.to_rgba8();
    }

    let scaled = u64::from(poster.width()) * u64::from(height) / u64::from(poster.height().max(1));
    let width = u32::try_from(scaled).unwrap_or(u32::MAX).max(1);
    poster
        .resize_exact(width, height, FilterType::Triangle)
        .to_rgba8()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};
    use std::path::Path;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
    const GREY: Rgba<u8> = Rgba([128, 128, 128, 255]);

    fn to_png_bytes(width: u32, height: u32, color: Rgba<u8>) -> Vec<u8> {
        let image: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_pixel(width, height, color);
        let mut out = Vec::new();
        DynamicImage::ImageRgba8(image)
            .write_to(&mut std::io::Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    fn gallery(source: MockImageSource, dir: &Path) -> PosterGallery<MockImageSource> {
        let placeholder = dir.join("error-message.png");
        std::fs::write(&placeholder, to_png_bytes(10, 10, GREY)).unwrap();
        PosterGallery::new(source, placeholder, dir.join("posters"))
    }

    #[tokio::test]
    async fn test_save_pair_combines_posters() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = MockImageSource::new();
        source.expect_fetch().times(2).returning(|url| {
            if url.ends_with("/1") {
                Ok(to_png_bytes(20, 10, RED))
            } else {
                Ok(to_png_bytes(30, 10, GREEN))
            }
        });

        let path = gallery(source, dir.path())
            .save_pair(&["https://img/1", "https://img/2"])
            .await
            .unwrap();

        assert!(path.ends_with("posters/posters.png"));
        let combined = image::open(&path).unwrap().to_rgba8();
        assert_eq!(combined.dimensions(), (50, 10));
        assert_eq!(*combined.get_pixel(0, 0), RED);
        assert_eq!(*combined.get_pixel(19, 9), RED);
        assert_eq!(*combined.get_pixel(20, 0), GREEN);
        assert_eq!(*combined.get_pixel(49, 9), GREEN);
    }

    #[tokio::test]
    async fn test_save_pair_scales_to_shorter_poster() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = MockImageSource::new();
        source.expect_fetch().times(2).returning(|url| {
            if url.ends_with("/1") {
                Ok(to_png_bytes(20, 20, RED))
            } else {
                Ok(to_png_bytes(10, 10, GREEN))
            }
        });

        let path = gallery(source, dir.path())
            .save_pair(&["https://img/1", "https://img/2"])
            .await
            .unwrap();

        let combined = image::open(&path).unwrap();
        assert_eq!((combined.width(), combined.height()), (20, 10));
    }

    #[tokio::test]
    async fn test_save_pair_falls_back_to_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = MockImageSource::new();
        source.expect_fetch().times(2).returning(|url| {
            if url.starts_with("https://") {
                Ok(to_png_bytes(10, 10, GREEN))
            } else {
                Err(AppError::ExternalApi("not found".to_string()))
            }
        });

        let path = gallery(source, dir.path())
            .save_pair(&["url1", "https://img/2"])
            .await
            .unwrap();

        let combined = image::open(&path).unwrap().to_rgba8();
        assert_eq!(combined.dimensions(), (20, 10));
        assert_eq!(*combined.get_pixel(0, 0), GREY);
        assert_eq!(*combined.get_pixel(10, 0), GREEN);
    }

    #[tokio::test]
    async fn test_save_pair_undecodable_bytes_use_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = MockImageSource::new();
        source.expect_fetch().times(2).returning(|url| {
            if url.ends_with("/1") {
                Ok(to_png_bytes(10, 10, RED))
            } else {
                Ok(b"<html>not an image</html>".to_vec())
            }
        });

        let path = gallery(source, dir.path())
            .save_pair(&["https://img/1", "https://img/2"])
            .await
            .unwrap();

        let combined = image::open(&path).unwrap().to_rgba8();
        assert_eq!(*combined.get_pixel(0, 0), RED);
        assert_eq!(*combined.get_pixel(15, 5), GREY);
    }

    #[tokio::test]
    async fn test_save_pair_missing_placeholder_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = MockImageSource::new();
        source
            .expect_fetch()
            .returning(|_| Err(AppError::ExternalApi("offline".to_string())));

        let gallery = PosterGallery::new(
            source,
            dir.path().join("missing.png"),
            dir.path().join("posters"),
        );
        let result = gallery.save_pair(&["url1", "url2"]).await;
        assert!(matches!(result, Err(AppError::Io(_))));
        assert!(!dir.path().join("posters").exists());
    }

    #[tokio::test]
    async fn test_save_pair_requires_two_urls() {
        let dir = tempfile::tempdir().unwrap();
        let result = gallery(MockImageSource::new(), dir.path())
            .save_pair(&["https://img/1"])
            .await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_fit_height_keeps_aspect_ratio() {
        let poster = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(40, 20, RED));
        assert_eq!(fit_height(&poster, 10).dimensions(), (20, 10));
        assert_eq!(fit_height(&poster, 20).dimensions(), (40, 20));
    }

    #[tokio::test]
    async fn test_http_source_invalid_url_fails() {
        let source = HttpImageSource::new(Duration::from_secs(1)).unwrap();
        assert!(source.fetch("url1").await.is_err());
    }
}
