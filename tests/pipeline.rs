use gesture_detect::source::synthetic_hand;
use gesture_detect::{
    Delivery, FingerExtension, FrameClassifier, FrameSummary, FrameWorker, Gesture, GestureConfig,
    GestureEvent, HandJoint, LandmarkFrame, LandmarkSource, PoseIndicator, PoseTarget,
    ReplaySource, WiggleTracking,
};
use std::io::Write;
use std::time::Duration;

const VICTORY: [bool; 5] = [false, true, true, false, false];
const THUMBS_UP: [bool; 5] = [true, false, false, false, false];

fn write_recording(frames: &[LandmarkFrame]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for frame in frames {
        writeln!(file, "{}", serde_json::to_string(frame).unwrap()).unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn replayed_recording_produces_expected_counts() {
    let frames = vec![
        LandmarkFrame::new(0.0, vec![]),
        LandmarkFrame::new(
            0.033,
            vec![
                synthetic_hand(0.3, 0.8, VICTORY, 0.9),
                synthetic_hand(0.7, 0.8, THUMBS_UP, 0.9),
            ],
        ),
    ];
    let file = write_recording(&frames);

    let mut source = ReplaySource::open(file.path()).unwrap();
    let mut classifier = FrameClassifier::new(GestureConfig::default());

    let empty = classifier.process_frame(&source.next_frame().unwrap().unwrap());
    assert_eq!(
        empty.events(),
        [
            GestureEvent::HandsDetected(0),
            GestureEvent::VictoryHands(0),
            GestureEvent::ThumbsUpHands(0),
            GestureEvent::WiggleHands(0),
        ]
    );

    let pair = classifier.process_frame(&source.next_frame().unwrap().unwrap());
    assert_eq!(pair.total_hands, 2);
    assert_eq!(pair.victory_hands, 1);
    assert_eq!(pair.thumbs_up_hands, 1);
    assert_eq!(
        pair.hands[0].fingers,
        Some(FingerExtension::from_array(VICTORY))
    );

    assert!(source.next_frame().unwrap().is_none());
}

#[test]
fn low_confidence_landmarks_never_match_a_gesture() {
    let mut classifier = FrameClassifier::new(GestureConfig::default());
    let hand = synthetic_hand(0.5, 0.8, VICTORY, 0.25);

    let summary = classifier.process_frame(&LandmarkFrame::new(0.0, vec![hand]));
    assert_eq!(summary.total_hands, 1);
    assert_eq!(summary.victory_hands, 0);
    assert_eq!(summary.hands[0].fingers, Some(FingerExtension::default()));
}

#[test]
fn wiggle_requires_movement_beyond_threshold() {
    let mut classifier = FrameClassifier::new(GestureConfig::default());
    let frame_at =
        |t: f64, x: f64| LandmarkFrame::new(t, vec![synthetic_hand(x, 0.8, VICTORY, 0.9)]);

    assert_eq!(classifier.process_frame(&frame_at(0.0, 0.40)).wiggle_hands, 0);
    assert_eq!(classifier.process_frame(&frame_at(0.1, 0.55)).wiggle_hands, 1);
    assert_eq!(classifier.process_frame(&frame_at(0.2, 0.60)).wiggle_hands, 0);
}

#[test]
fn hand_without_index_tip_leaves_wiggle_state_alone() {
    let mut classifier = FrameClassifier::new(GestureConfig::default());
    let start = LandmarkFrame::new(0.0, vec![synthetic_hand(0.2, 0.8, VICTORY, 0.9)]);
    classifier.process_frame(&start);

    let mut tipless = synthetic_hand(0.9, 0.8, VICTORY, 0.9);
    tipless.joints.remove(&HandJoint::IndexTip);
    let summary = classifier.process_frame(&LandmarkFrame::new(0.1, vec![tipless]));
    assert_eq!(summary.wiggle_hands, 0);

    // still compared with the first frame's tip
    let nearby = LandmarkFrame::new(0.2, vec![synthetic_hand(0.22, 0.8, VICTORY, 0.9)]);
    let summary = classifier.process_frame(&nearby);
    assert_eq!(summary.wiggle_hands, 0);
}

#[test]
fn per_hand_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"wiggle_tracking": "per_hand"}}"#).unwrap();
    let config = GestureConfig::from_path(file.path()).unwrap();
    assert_eq!(config.wiggle_tracking, WiggleTracking::PerHand);

    let mut classifier = FrameClassifier::new(config);
    let frame = LandmarkFrame::new(
        0.0,
        vec![
            synthetic_hand(0.2, 0.8, VICTORY, 0.9),
            synthetic_hand(0.8, 0.8, THUMBS_UP, 0.9),
        ],
    );
    assert_eq!(classifier.process_frame(&frame).wiggle_hands, 0);
    assert_eq!(classifier.process_frame(&frame).wiggle_hands, 0);
}

#[test]
fn victory_indicator_needs_two_hands_and_holds() {
    let mut classifier = FrameClassifier::new(GestureConfig::default());
    let mut indicator = PoseIndicator::new(PoseTarget::Victory, Duration::from_secs(1));

    let one_hand = LandmarkFrame::new(0.0, vec![synthetic_hand(0.5, 0.8, VICTORY, 0.9)]);
    assert!(!indicator.update(&classifier.process_frame(&one_hand)));

    let two_hands = LandmarkFrame::new(
        0.5,
        vec![
            synthetic_hand(0.3, 0.8, VICTORY, 0.9),
            synthetic_hand(0.7, 0.8, [true; 5], 0.9),
        ],
    );
    let summary = classifier.process_frame(&two_hands);
    assert_eq!(summary.count(Gesture::Victory), 1);
    assert!(indicator.update(&summary));

    let gone = LandmarkFrame::new(1.0, vec![]);
    assert!(indicator.update(&classifier.process_frame(&gone)));
    let later = LandmarkFrame::new(1.6, vec![]);
    assert!(!indicator.update(&classifier.process_frame(&later)));
}

#[tokio::test]
async fn worker_streams_summaries_in_order() {
    let (worker, mut results) =
        FrameWorker::spawn(FrameClassifier::new(GestureConfig::default()));

    for i in 0..3u64 {
        let frame = LandmarkFrame::new(
            i as f64 * 0.033,
            vec![synthetic_hand(0.5, 0.8, THUMBS_UP, 0.9)],
        );
        assert!(worker.submit(frame).unwrap());
        let summary = results.recv().await.unwrap();
        assert_eq!(summary.frame_index, i);
        assert_eq!(summary.thumbs_up_hands, 1);
    }

    let classifier = worker.shutdown().await.unwrap();
    assert_eq!(classifier.frames_processed(), 3);
}

fn classify_directly(path: &std::path::Path) -> Vec<FrameSummary> {
    let mut source = ReplaySource::open(path).unwrap();
    let mut classifier = FrameClassifier::new(GestureConfig::default());
    let mut summaries = Vec::new();
    while let Some(frame) = source.next_frame().unwrap() {
        summaries.push(classifier.process_frame(&frame));
    }
    summaries
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn replay_through_worker_matches_direct_classification() {
    // an index finger swinging 0.3 -> 0.7 -> 0.3 with a second hand joining
    // every third frame
    let frames: Vec<LandmarkFrame> = (0..1000)
        .map(|i| {
            let x = if i % 2 == 0 { 0.3 } else { 0.7 };
            let mut hands = vec![synthetic_hand(x, 0.8, VICTORY, 0.9)];
            if i % 3 == 0 {
                hands.push(synthetic_hand(0.5, 0.6, THUMBS_UP, 0.9));
            }
            LandmarkFrame::new(i as f64 / 30.0, hands)
        })
        .collect();
    let file = write_recording(&frames);
    let expected = classify_directly(file.path());
    assert_eq!(expected.len(), 1000);

    let (worker, mut results) =
        FrameWorker::spawn(FrameClassifier::new(GestureConfig::default()));
    let collector = tokio::spawn(async move {
        let mut summaries = Vec::new();
        while let Some(summary) = results.recv().await {
            summaries.push(summary);
        }
        summaries
    });

    let mut source = ReplaySource::open(file.path()).unwrap();
    worker.feed(&mut source, Delivery::Lossless).await.unwrap();
    assert_eq!(worker.offered_frames(), 1000);
    assert_eq!(worker.dropped_frames(), 0);
    worker.shutdown().await.unwrap();

    assert_eq!(collector.await.unwrap(), expected);
}
