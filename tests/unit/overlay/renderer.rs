use super::*;
use crate::encode::sink::InMemorySink;
use crate::encode::source::InMemorySource;
use crate::overlay::transform::{Identity, ReplacementTable};

/// Draws every line as a solid box: 10 px per char wide, 20 px tall.
struct BoxRasterizer;

impl TextRasterizer for BoxRasterizer {
    fn measure(&mut self, line: &str) -> ClipResult<LineExtent> {
        if line.is_empty() {
            return Ok(LineExtent::default());
        }
        Ok(LineExtent {
            width: 10.0 * line.chars().count() as f32,
            height: 20.0,
        })
    }

    fn rasterize(&mut self, canvas: Canvas, draws: &[LineDraw]) -> ClipResult<Option<TextLayer>> {
        let mut rgba = vec![0u8; canvas.rgba_len()];
        for d in draws {
            let ext = self.measure(&d.text)?;
            let x0 = d.x.max(0.0) as u32;
            let y0 = d.y.max(0.0) as u32;
            let x1 = ((d.x + ext.width) as u32).min(canvas.width);
            let y1 = ((d.y + ext.height) as u32).min(canvas.height);
            for y in y0..y1 {
                for x in x0..x1 {
                    let i = ((y * canvas.width + x) * 4) as usize;
                    rgba[i..i + 4].copy_from_slice(&d.rgba);
                }
            }
        }
        Ok(TextLayer::crop_from_canvas(canvas, &rgba))
    }
}

fn canvas(width: u32, height: u32) -> Canvas {
    Canvas { width, height }
}

fn entry(start: f64, end: f64, text: &str) -> TimedTextEntry {
    TimedTextEntry {
        start,
        end,
        text: text.to_owned(),
    }
}

fn extents(lines: &[&str]) -> (Vec<String>, Vec<LineExtent>) {
    let mut r = BoxRasterizer;
    let lines: Vec<String> = lines.iter().map(|s| (*s).to_owned()).collect();
    let ext = lines.iter().map(|l| r.measure(l).unwrap()).collect();
    (lines, ext)
}

fn black_frames(n: usize, c: Canvas) -> Vec<FrameRGBA> {
    (0..n).map(|_| FrameRGBA::filled(c, [0, 0, 0, 255])).collect()
}

#[test]
fn mid_block_is_centered_with_shadow_first() {
    let (lines, ext) = extents(&["ab", "abcd"]);
    let draws = layout_block(&lines, &ext, canvas(100, 100), &OverlayConfig::default());
    let spots: Vec<(f32, f32, [u8; 4])> = draws.iter().map(|d| (d.x, d.y, d.rgba)).collect();
    assert_eq!(
        spots,
        vec![
            (42.0, 27.0, [0, 0, 0, 255]),
            (40.0, 25.0, [255, 255, 255, 255]),
            (32.0, 57.0, [0, 0, 0, 255]),
            (30.0, 55.0, [255, 255, 255, 255]),
        ]
    );
}

#[test]
fn bottom_block_folds_offset_into_centering() {
    let (lines, ext) = extents(&["ab", "abcd"]);
    let cfg = OverlayConfig {
        placement: TextPlacement::Bottom,
        bottom_offset_px: 20,
        ..OverlayConfig::default()
    };
    let draws = layout_block(&lines, &ext, canvas(100, 100), &cfg);
    assert_eq!(draws[1].y, 35.0);
    assert_eq!(draws[3].y, 65.0);
}

#[test]
fn empty_lines_take_spacing_but_no_height() {
    let (lines, ext) = extents(&["a", "", "b"]);
    let draws = layout_block(&lines, &ext, canvas(100, 100), &OverlayConfig::default());
    assert_eq!(draws.len(), 4);
    assert_eq!(draws[1].y, 20.0);
    assert_eq!(draws[3].y, 60.0);
    assert!(layout_block(&[], &[], canvas(100, 100), &OverlayConfig::default()).is_empty());
}

#[test]
fn entry_layer_wraps_long_text_into_two_rows() {
    let cfg = OverlayConfig {
        shadow_offset_px: 0,
        ..OverlayConfig::default()
    };
    let layer = render_entry_layer(
        &mut BoxRasterizer,
        &"x".repeat(70),
        canvas(400, 200),
        &cfg,
        &Identity,
    )
    .unwrap()
    .unwrap();
    // Two 350x20 rows with 10 px between them.
    assert_eq!((layer.width, layer.height), (350, 50));
    assert_eq!((layer.x, layer.y), (25, 75));
}

#[test]
fn transform_runs_before_measuring() {
    let table = ReplacementTable::new(vec![("a".to_owned(), "aaa".to_owned())]).unwrap();
    let cfg = OverlayConfig {
        shadow_offset_px: 0,
        ..OverlayConfig::default()
    };
    let layer = render_entry_layer(&mut BoxRasterizer, "a", canvas(100, 100), &cfg, &table)
        .unwrap()
        .unwrap();
    assert_eq!(layer.width, 30);
}

#[test]
fn text_appears_exactly_on_visible_frames() {
    let c = canvas(60, 40);
    let fps = Fps::new(10, 1).unwrap();
    let overlay = TextOverlay::prepare(
        vec![entry(0.0, 0.5, "hi")],
        c,
        &OverlayConfig::default(),
        &Identity,
        || Ok(BoxRasterizer),
        None,
    )
    .unwrap();

    let mut source = InMemorySource::new(black_frames(10, c), fps).unwrap();
    let mut sink = InMemorySink::new();
    let threading = RenderThreading {
        parallel: false,
        chunk_size: 3,
        threads: None,
    };
    let stats = overlay_stream(&mut source, &mut sink, &overlay, threading, None).unwrap();

    assert_eq!(stats.frames, 10);
    assert_eq!(stats.frames_with_text, 6);
    assert_eq!(sink.frames().len(), 10);
    for (i, (idx, frame)) in sink.frames().iter().enumerate() {
        assert_eq!(idx.0, i as u64);
        assert_eq!(frame.canvas(), c);
        let has_white = frame.data.chunks_exact(4).any(|px| px == [255, 255, 255, 255]);
        assert_eq!(has_white, i <= 5, "frame {i}");
    }
}

#[test]
fn adjacent_entries_both_draw_on_shared_boundary() {
    let c = canvas(100, 100);
    let overlay = TextOverlay::prepare(
        vec![entry(0.0, 1.0, "a"), entry(1.0, 2.0, "b")],
        c,
        &OverlayConfig::default(),
        &Identity,
        || Ok(BoxRasterizer),
        None,
    )
    .unwrap();
    assert_eq!(overlay.visible_at(1.0).count(), 2);
    assert_eq!(overlay.visible_at(0.5).count(), 1);
    assert_eq!(overlay.visible_at(2.5).count(), 0);
}

#[test]
fn parallel_and_sequential_outputs_match() {
    let c = canvas(80, 60);
    let fps = Fps::new(30, 1).unwrap();
    let entries = vec![entry(0.1, 0.4, "one\ntwo"), entry(0.5, 0.9, "three")];
    let pool = build_thread_pool(RenderThreading {
        parallel: true,
        chunk_size: 4,
        threads: Some(3),
    })
    .unwrap()
    .unwrap();

    let run = |pool: Option<&rayon::ThreadPool>| {
        let overlay = TextOverlay::prepare(
            entries.clone(),
            c,
            &OverlayConfig::default(),
            &Identity,
            || Ok(BoxRasterizer),
            pool,
        )
        .unwrap();
        let mut source = InMemorySource::new(black_frames(30, c), fps).unwrap();
        let mut sink = InMemorySink::new();
        let threading = RenderThreading {
            parallel: pool.is_some(),
            chunk_size: 4,
            threads: None,
        };
        overlay_stream(&mut source, &mut sink, &overlay, threading, pool).unwrap();
        sink.frames().to_vec()
    };

    assert_eq!(run(Some(&pool)), run(None));
}

#[test]
fn empty_overlay_passes_frames_through() {
    let c = canvas(4, 4);
    let frames = black_frames(3, c);
    let mut source = InMemorySource::new(frames.clone(), Fps::new(60, 1).unwrap()).unwrap();
    let mut sink = InMemorySink::new();
    let stats = overlay_stream(
        &mut source,
        &mut sink,
        &TextOverlay::empty(),
        RenderThreading::default(),
        None,
    )
    .unwrap();
    assert_eq!(stats.frames_with_text, 0);
    let out: Vec<FrameRGBA> = sink.frames().iter().map(|(_, f)| f.clone()).collect();
    assert_eq!(out, frames);
}

#[test]
fn pool_respects_sequential_setting_and_rejects_zero_threads() {
    let seq = RenderThreading {
        parallel: false,
        ..RenderThreading::default()
    };
    assert!(build_thread_pool(seq).unwrap().is_none());
    let zero = RenderThreading {
        threads: Some(0),
        ..RenderThreading::default()
    };
    assert!(build_thread_pool(zero).is_err());
}

#[test]
fn chunk_size_is_bounded_by_memory() {
    assert_eq!(chunk_size_for(64, 720, 900), 64);
    assert_eq!(chunk_size_for(0, 720, 900), 1);
    assert!(chunk_size_for(100_000, 720, 900) < 100_000);
}
