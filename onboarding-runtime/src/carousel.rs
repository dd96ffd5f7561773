//! # Carousel 模块
//!
//! 教育卡片轮播的状态机。
//!
//! ## 单张卡片的序列
//!
//! ```text
//! Hidden ──rise──► RisingToCenter ──► ExpandedHolding ──hold──►
//!        ┌─ 非最后一张：预备下一张 → 独立任务折叠 → 等待 advance_delay → 游标 +1
//!        └─ 最后一张：折叠（高度保持展开）→ 再停留 hold → Finished
//! ```
//!
//! 折叠动画交给 `run` 内的折叠驱动并发推进，游标只等待 `advance_delay`，
//! 两者互不等待，因此折叠与下一张卡片的上升在视觉上重叠。
//! 折叠驱动与游标在同一个 future 内轮询，不需要 `LocalSet`。

use std::cell::{Cell, RefCell};

use futures::StreamExt;
use futures::future::{FutureExt, LocalBoxFuture};
use futures::stream::FuturesUnordered;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::animation::{AnimationSpec, EasingFunction, FrameClock};
use crate::backdrop::Backdrop;
use crate::card::{CardPhase, CardSnapshot, CardVisualState};
use crate::error::{SessionError, SessionResult};
use crate::event::{EventSink, OnboardingEvent};
use crate::layout::{CarouselTimings, LayoutMetrics};
use crate::model::CardDescriptor;

/// 进行中的折叠动画
type CollapseTask = LocalBoxFuture<'static, SessionResult<()>>;

/// `step` 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// 当前卡片序列完成，游标已前进
    Advanced,
    /// 最后一张卡片完成，已发出 Finished
    Finished,
    /// 游标越界或会话已结束，本次不做任何过渡
    Idle,
}

/// 轮播控制器
pub struct CarouselController {
    descriptors: Vec<CardDescriptor>,
    cards: Vec<CardVisualState>,
    layout: LayoutMetrics,
    timings: CarouselTimings,
    clock: FrameClock,
    cursor: Cell<usize>,
    finished: watch::Sender<bool>,
    /// `run` 期间存在：把折叠动画交给折叠驱动
    collapses: RefCell<Option<mpsc::UnboundedSender<CollapseTask>>>,
    events: EventSink,
}

impl CarouselController {
    /// 为每个描述符创建一份卡片状态
    pub fn new(
        descriptors: Vec<CardDescriptor>,
        layout: LayoutMetrics,
        timings: CarouselTimings,
        clock: FrameClock,
        events: EventSink,
    ) -> Self {
        let cards = (0..descriptors.len())
            .map(|index| CardVisualState::new(index, &layout, &clock))
            .collect();
        let (finished, _) = watch::channel(false);

        Self {
            descriptors,
            cards,
            layout,
            timings,
            clock,
            cursor: Cell::new(0),
            finished,
            collapses: RefCell::new(None),
            events,
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[CardVisualState] {
        &self.cards
    }

    pub fn descriptors(&self) -> &[CardDescriptor] {
        &self.descriptors
    }

    pub fn layout(&self) -> &LayoutMetrics {
        &self.layout
    }

    /// 当前激活索引（空序列时为 `None`）
    pub fn active_index(&self) -> Option<usize> {
        let index = self.cursor.get();
        (index < self.cards.len()).then_some(index)
    }

    pub fn is_finished(&self) -> bool {
        *self.finished.borrow()
    }

    /// 订阅完成信号
    pub fn finished_signal(&self) -> watch::Receiver<bool> {
        self.finished.subscribe()
    }

    /// 当前激活卡片派生的背景
    pub fn backdrop(&self) -> Option<Backdrop> {
        let index = self.active_index()?;
        self.descriptors
            .get(index)
            .map(|card| Backdrop::for_card(card, self.layout.viewport_height))
    }

    pub fn snapshot(&self) -> Vec<CardSnapshot> {
        self.cards
            .iter()
            .zip(&self.descriptors)
            .map(|(card, descriptor)| card.snapshot(&self.layout, descriptor))
            .collect()
    }

    /// 运行完整序列直到发出 Finished
    pub async fn run(&self) -> SessionResult<()> {
        if self.cards.is_empty() {
            info!("卡片序列为空，直接完成");
            self.finish();
            return Ok(());
        }

        info!(cards = self.cards.len(), "轮播开始");
        let (tx, rx) = mpsc::unbounded_channel();
        *self.collapses.borrow_mut() = Some(tx);

        let cursor = async {
            let result = self.advance_all().await;
            // 关闭通道，折叠驱动落定剩余折叠后退出
            *self.collapses.borrow_mut() = None;
            result
        };
        let result = tokio::try_join!(cursor, drive_collapses(rx));
        *self.collapses.borrow_mut() = None;
        result.map(|_| ())
    }

    async fn advance_all(&self) -> SessionResult<()> {
        loop {
            match self.step().await? {
                StepOutcome::Advanced => continue,
                StepOutcome::Finished | StepOutcome::Idle => return Ok(()),
            }
        }
    }

    /// 执行游标所指卡片的完整序列
    pub async fn step(&self) -> SessionResult<StepOutcome> {
        let index = self.cursor.get();
        if self.is_finished() {
            return Ok(StepOutcome::Idle);
        }
        let Some(card) = self.cards.get(index) else {
            warn!(index, len = self.cards.len(), "激活索引越界，跳过本次过渡");
            return Ok(StepOutcome::Idle);
        };

        self.events.emit(OnboardingEvent::Activated { index });
        debug!(index, "激活卡片");

        self.rise(card).await?;

        card.set_phase(CardPhase::ExpandedHolding);
        self.events.emit(OnboardingEvent::Holding { index });
        self.clock.delay(self.timings.hold).await?;

        let top_offset = self.layout.stacked_offset(index);
        let collapse = AnimationSpec::tween(self.timings.collapse, EasingFunction::FastOutSlowIn);

        if let Some(next) = self.cards.get(index + 1) {
            next.stage_at_bottom(&self.layout);
            self.events.emit(OnboardingEvent::NextStaged { index: index + 1 });

            let task = self
                .begin_collapse(card, top_offset, self.layout.collapsed_height, collapse)
                .boxed_local();
            let advance = async {
                self.clock.delay(self.timings.advance_delay).await?;
                self.cursor.set(index + 1);
                Ok::<_, SessionError>(())
            };

            match self.dispatch_collapse(task) {
                None => advance.await?,
                // 不在 run 内：折叠与等待在本次 step 中并行推进
                Some(task) => {
                    tokio::try_join!(task, advance)?;
                }
            }
            Ok(StepOutcome::Advanced)
        } else {
            // 最后一张卡片折叠到展开高度，保持大卡片
            self.begin_collapse(card, top_offset, self.layout.expanded_height(), collapse)
                .await?;

            self.clock.delay(self.timings.hold).await?;
            self.finish();
            Ok(StepOutcome::Finished)
        }
    }

    async fn rise(&self, card: &CardVisualState) -> SessionResult<()> {
        let index = card.index();
        let snapping_point = self.layout.snapping_point(index);
        let spec = AnimationSpec::tween(self.timings.rise, EasingFunction::FastOutSlowIn);

        card.set_phase(CardPhase::RisingToCenter);
        self.events.emit(OnboardingEvent::RiseStarted {
            index,
            snapping_point,
        });

        let (offset, height) = tokio::join!(
            card.y_offset.animate_to(snapping_point, spec),
            card.height.animate_to(self.layout.expanded_height(), spec),
        );
        offset?;
        height?;
        Ok(())
    }

    /// 同步进入折叠阶段并发出事件，返回驱动动画的 future
    fn begin_collapse(
        &self,
        card: &CardVisualState,
        top_offset: f32,
        target_height: f32,
        spec: AnimationSpec,
    ) -> impl Future<Output = SessionResult<()>> + use<> {
        let index = card.index();
        card.set_phase(CardPhase::CollapsingToStack);
        self.events.emit(OnboardingEvent::CollapseStarted {
            index,
            top_offset,
            target_height,
        });

        let card = card.clone();
        let events = self.events.clone();
        async move {
            let (offset, height) = tokio::join!(
                card.y_offset.animate_to(top_offset, spec),
                card.height.animate_to(target_height, spec),
            );
            offset?;
            height?;
            card.set_phase(CardPhase::StackedCollapsed);
            events.emit(OnboardingEvent::Stacked { index });
            Ok(())
        }
    }

    /// 交给折叠驱动；没有驱动时原样返回
    fn dispatch_collapse(&self, task: CollapseTask) -> Option<CollapseTask> {
        match self.collapses.borrow().as_ref() {
            Some(tx) => tx.send(task).err().map(|e| e.0),
            None => Some(task),
        }
    }

    fn finish(&self) {
        if self.is_finished() {
            return;
        }
        self.finished.send_replace(true);
        self.events.emit(OnboardingEvent::Finished);
        info!("轮播完成");
    }
}

/// 并发推进所有折叠动画，直到通道关闭且全部落定
async fn drive_collapses(
    mut incoming: mpsc::UnboundedReceiver<CollapseTask>,
) -> SessionResult<()> {
    let mut running = FuturesUnordered::new();
    loop {
        tokio::select! {
            next = incoming.recv() => match next {
                Some(task) => running.push(task),
                None => break,
            },
            Some(result) = running.next() => result?,
        }
    }
    while let Some(result) = running.next().await {
        result?;
    }
    Ok(())
}

impl std::fmt::Debug for CarouselController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarouselController")
            .field("cards", &self.cards.len())
            .field("cursor", &self.cursor.get())
            .field("finished", &self.is_finished())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::time::Duration;

    use tokio::sync::mpsc;
    use tokio::task::LocalSet;
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::color::Color;

    pub(crate) fn descriptors(n: usize) -> Vec<CardDescriptor> {
        (0..n)
            .map(|i| CardDescriptor {
                image: format!("https://example.com/{i}.png"),
                collapsed_text: format!("card {i}"),
                expanded_text: format!("expanded card {i}"),
                background: Color::rgba(0.1 * i as f32, 0.0, 0.0, 1.0),
                stroke_start: Color::WHITE,
                stroke_end: Color::WHITE,
                gradient_start: Color::rgba(0.0, 0.1 * i as f32, 0.0, 1.0),
                gradient_end: Color::rgba(0.0, 0.0, 0.1 * i as f32, 1.0),
            })
            .collect()
    }

    fn controller(
        n: usize,
        timings: CarouselTimings,
    ) -> (
        CarouselController,
        mpsc::UnboundedReceiver<OnboardingEvent>,
        CancellationToken,
    ) {
        let token = CancellationToken::new();
        let clock = FrameClock::new(Duration::from_millis(10), token.clone());
        let (events, rx) = EventSink::channel();
        let controller = CarouselController::new(
            descriptors(n),
            LayoutMetrics::default(),
            timings,
            clock,
            events,
        );
        (controller, rx, token)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<OnboardingEvent>) -> Vec<OnboardingEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn position(events: &[OnboardingEvent], wanted: &OnboardingEvent) -> usize {
        events
            .iter()
            .position(|e| e == wanted)
            .unwrap_or_else(|| panic!("missing event {wanted:?}"))
    }

    #[tokio::test(start_paused = true)]
    async fn test_visits_every_index_in_order_and_finishes_once() {
        for n in [1, 2, 3, 5] {
            let (carousel, mut rx, _token) = controller(n, CarouselTimings::default());
            carousel.run().await.unwrap();

            let events = drain(&mut rx);
            let activated: Vec<usize> = events
                .iter()
                .filter_map(|e| match e {
                    OnboardingEvent::Activated { index } => Some(*index),
                    _ => None,
                })
                .collect();
            assert_eq!(activated, (0..n).collect::<Vec<_>>());

            let finished = events
                .iter()
                .filter(|e| **e == OnboardingEvent::Finished)
                .count();
            assert_eq!(finished, 1);
            assert!(carousel.is_finished());

            // Finished 在最后一张卡片折叠之后
            let last_collapse = events
                .iter()
                .rposition(|e| matches!(e, OnboardingEvent::CollapseStarted { .. }))
                .unwrap();
            assert!(position(&events, &OnboardingEvent::Finished) > last_collapse);
        }
    }

    /// 不在 LocalSet 内也能运行，折叠全部落定
    #[tokio::test(start_paused = true)]
    async fn test_run_on_plain_runtime() {
        let (carousel, mut rx, _token) = controller(2, CarouselTimings::default());
        carousel.run().await.unwrap();

        let stacked = drain(&mut rx)
            .into_iter()
            .filter(|e| matches!(e, OnboardingEvent::Stacked { .. }))
            .count();
        assert_eq!(stacked, 2);
        assert!(
            carousel
                .snapshot()
                .iter()
                .all(|card| card.phase == CardPhase::StackedCollapsed)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_step_outside_run_completes_collapse() {
        let (carousel, _rx, _token) = controller(2, CarouselTimings::default());

        assert_eq!(carousel.step().await, Ok(StepOutcome::Advanced));
        assert_eq!(carousel.active_index(), Some(1));
        let first = carousel.snapshot()[0];
        assert_eq!(first.phase, CardPhase::StackedCollapsed);
        assert_eq!(first.height, carousel.layout().collapsed_height);

        assert_eq!(carousel.step().await, Ok(StepOutcome::Finished));
        assert!(carousel.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_sequence_finishes_immediately() {
        let (carousel, mut rx, _token) = controller(0, CarouselTimings::default());
        let start = tokio::time::Instant::now();

        carousel.run().await.unwrap();

        assert_eq!(tokio::time::Instant::now(), start);
        assert!(carousel.is_finished());
        assert_eq!(carousel.active_index(), None);
        assert!(carousel.snapshot().is_empty());
        assert!(carousel.backdrop().is_none());
        assert_eq!(drain(&mut rx), vec![OnboardingEvent::Finished]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_range_step_is_noop() {
        let (carousel, mut rx, _token) = controller(0, CarouselTimings::default());
        assert_eq!(carousel.step().await, Ok(StepOutcome::Idle));
        assert!(!carousel.is_finished());
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_step_after_finish_is_noop() {
        LocalSet::new()
            .run_until(async {
                let (carousel, mut rx, _token) = controller(2, CarouselTimings::default());
                carousel.run().await.unwrap();
                drain(&mut rx);

                assert_eq!(carousel.step().await, Ok(StepOutcome::Idle));
                assert!(drain(&mut rx).is_empty());
                assert_eq!(carousel.active_index(), Some(1));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_card_staged_before_collapse() {
        LocalSet::new()
            .run_until(async {
                let n = 4;
                let (carousel, mut rx, _token) = controller(n, CarouselTimings::default());
                carousel.run().await.unwrap();
                let events = drain(&mut rx);

                for i in 0..n - 1 {
                    let staged = position(&events, &OnboardingEvent::NextStaged { index: i + 1 });
                    let collapse = events
                        .iter()
                        .position(|e| {
                            matches!(e, OnboardingEvent::CollapseStarted { index, .. } if *index == i)
                        })
                        .unwrap();
                    assert!(staged < collapse, "card {i}: staged {staged} collapse {collapse}");
                }
                // 最后一张卡片之后没有可预备的卡片
                assert!(!events.contains(&OnboardingEvent::NextStaged { index: n }));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_card_collapses_to_expanded_height() {
        LocalSet::new()
            .run_until(async {
                let n = 3;
                let (carousel, mut rx, _token) = controller(n, CarouselTimings::default());
                carousel.run().await.unwrap();
                let layout = *carousel.layout();

                let targets: Vec<(usize, f32, f32)> = drain(&mut rx)
                    .into_iter()
                    .filter_map(|e| match e {
                        OnboardingEvent::CollapseStarted {
                            index,
                            top_offset,
                            target_height,
                        } => Some((index, top_offset, target_height)),
                        _ => None,
                    })
                    .collect();
                assert_eq!(targets.len(), n);

                for &(index, top, height) in &targets[..n - 1] {
                    assert_eq!(top, layout.stacked_offset(index));
                    assert_eq!(height, layout.collapsed_height);
                }
                let (_, last_top, last_height) = targets[n - 1];
                assert_eq!(last_top, layout.stacked_offset(n - 1));
                assert_eq!(last_height, layout.expanded_height());
                assert_ne!(last_height, layout.collapsed_height);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_final_resting_positions() {
        LocalSet::new()
            .run_until(async {
                let n = 3;
                let (carousel, _rx, _token) = controller(n, CarouselTimings::default());
                carousel.run().await.unwrap();
                let layout = *carousel.layout();

                let cards = carousel.snapshot();
                for card in &cards {
                    assert_eq!(card.phase, CardPhase::StackedCollapsed);
                    assert_eq!(card.y_offset, layout.stacked_offset(card.index));
                    assert_eq!(card.opacity, 1.0);
                }
                assert_eq!(cards[0].height, layout.collapsed_height);
                assert_eq!(cards[1].height, layout.collapsed_height);
                assert!(!cards[0].shows_expanded_content);
                assert_eq!(cards[2].height, layout.expanded_height());
                assert_eq!(cards[2].y_offset, 152.0);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_collapse_overlaps_next_rise() {
        LocalSet::new()
            .run_until(async {
                let timings = CarouselTimings {
                    rise: Duration::from_millis(100),
                    hold: Duration::from_millis(100),
                    collapse: Duration::from_millis(1000),
                    advance_delay: Duration::from_millis(200),
                };
                let (carousel, _rx, _token) = controller(2, timings);
                let carousel = std::rc::Rc::new(carousel);
                let runner = carousel.clone();
                let task = tokio::task::spawn_local(async move { runner.run().await });

                // rise 100 + hold 100 + advance 200 → 游标在 400ms 前进，而折叠持续到 ~1200ms
                tokio::time::sleep(Duration::from_millis(450)).await;
                assert_eq!(carousel.active_index(), Some(1));
                let cards = carousel.snapshot();
                assert_eq!(cards[0].phase, CardPhase::CollapsingToStack);
                assert_eq!(cards[1].phase, CardPhase::RisingToCenter);

                task.await.unwrap().unwrap();
                assert_eq!(carousel.snapshot()[0].phase, CardPhase::StackedCollapsed);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_rise_never_precedes_previous_hold() {
        LocalSet::new()
            .run_until(async {
                let timings = CarouselTimings::default();
                let (carousel, _rx, _token) = controller(2, timings);
                let carousel = std::rc::Rc::new(carousel);
                let runner = carousel.clone();
                let task = tokio::task::spawn_local(async move { runner.run().await });

                // 第一张卡片 rise(800) + hold(1000) 结束前，第二张卡片不会被激活
                tokio::time::sleep(Duration::from_millis(1750)).await;
                assert_eq!(carousel.active_index(), Some(0));
                assert_eq!(carousel.snapshot()[1].phase, CardPhase::Hidden);
                assert_eq!(carousel.snapshot()[1].opacity, 0.0);

                task.await.unwrap().unwrap();
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_backdrop_follows_active_index() {
        LocalSet::new()
            .run_until(async {
                let (carousel, _rx, _token) = controller(2, CarouselTimings::default());
                let carousel = std::rc::Rc::new(carousel);

                let first = carousel.backdrop().unwrap();
                assert_eq!(first.gradient.top, carousel.descriptors()[0].gradient_start);

                let runner = carousel.clone();
                tokio::task::spawn_local(async move { runner.run().await })
                    .await
                    .unwrap()
                    .unwrap();

                let last = carousel.backdrop().unwrap();
                let card = &carousel.descriptors()[1];
                assert_eq!(last.gradient.top, card.gradient_start);
                assert_eq!(last.gradient.bottom, card.gradient_end.with_alpha(0.32));
                assert_eq!(last.card_fill, card.background.with_alpha(0.32));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_mid_session() {
        LocalSet::new()
            .run_until(async {
                let (carousel, mut rx, token) = controller(3, CarouselTimings::default());
                let carousel = std::rc::Rc::new(carousel);
                let runner = carousel.clone();
                let task = tokio::task::spawn_local(async move { runner.run().await });

                tokio::time::sleep(Duration::from_millis(2500)).await;
                token.cancel();
                assert_eq!(task.await.unwrap(), Err(SessionError::Cancelled));

                let frozen = carousel.snapshot();
                tokio::time::sleep(Duration::from_secs(10)).await;
                assert_eq!(carousel.snapshot(), frozen);
                assert!(!carousel.is_finished());
                assert!(!drain(&mut rx).contains(&OnboardingEvent::Finished));
            })
            .await;
    }
}
