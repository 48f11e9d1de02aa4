use crate::domain::model::{
    CapturedPhoto, Facing, FlowSnapshot, FlowState, MultiFacePolicy, Notification, Phase, Verdict,
};
use crate::domain::ports::{Camera, PermissionGate, PermissionStatus, Recognizer};
use crate::utils::error::{Result, RiceError};
use tokio::sync::broadcast;

const SNAPSHOT_CHANNEL_CAPACITY: usize = 32;

/// One capture session at a time: permission, capture, upload, verdict.
///
/// Every operation takes `&mut self`, so nothing else can run while a capture
/// or an upload is awaited. The camera is bound only while permission is
/// granted and is released when the flow is dropped.
pub struct CaptureAndClassifyFlow<C: Camera, R: Recognizer, P: PermissionGate> {
    camera: C,
    recognizer: R,
    permission: P,
    policy: MultiFacePolicy,
    facing: Facing,
    state: FlowState,
    notification: Option<Notification>,
    snapshots: broadcast::Sender<FlowSnapshot>,
}

impl<C: Camera, R: Recognizer, P: PermissionGate> CaptureAndClassifyFlow<C, R, P> {
    pub fn new(camera: C, recognizer: R, permission: P, policy: MultiFacePolicy, facing: Facing) -> Self {
        let (snapshots, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        let mut flow = Self {
            camera,
            recognizer,
            permission,
            policy,
            facing,
            state: FlowState::PermissionRequired,
            notification: None,
            snapshots,
        };

        if flow.permission.status().is_granted() {
            flow.bind_camera();
            flow.state = FlowState::Idle;
        }
        flow
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn policy(&self) -> MultiFacePolicy {
        self.policy
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FlowSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> FlowSnapshot {
        let (photo_uri, scores) = match &self.state {
            FlowState::Uploading { photo } => (Some(photo.uri.clone()), None),
            FlowState::Displaying { photo, result, .. } => {
                (Some(photo.uri.clone()), Some(result.scores().to_vec()))
            }
            _ => (None, None),
        };

        FlowSnapshot {
            phase: self.state.phase(),
            facing: self.facing,
            photo_uri,
            scores,
            notification: self.notification.clone(),
        }
    }

    pub async fn request_camera_permission(&mut self) -> PermissionStatus {
        let status = self.permission.request().await;
        tracing::info!(?status, "camera permission requested");

        if status.is_granted() && self.state == FlowState::PermissionRequired {
            self.bind_camera();
            self.transition(FlowState::Idle);
        }
        status
    }

    /// Drops everything tied to the camera and waits for a new grant.
    pub fn revoke_permission(&mut self) {
        tracing::info!("camera permission revoked");
        self.camera.close();
        self.notification = None;
        self.transition(FlowState::PermissionRequired);
    }

    pub fn toggle_facing(&mut self) -> Facing {
        self.facing = self.facing.toggled();
        tracing::debug!(facing = %self.facing, "camera facing toggled");
        self.notification = None;

        if self.camera.is_open() {
            self.camera.close();
            self.bind_camera();
        }
        self.publish();
        self.facing
    }

    pub async fn capture_photo(&mut self) -> Result<Verdict> {
        match self.state.phase() {
            Phase::Idle => {}
            Phase::PermissionRequired => return Err(RiceError::PermissionDenied),
            phase => {
                return Err(RiceError::InvalidState {
                    operation: "capture".to_string(),
                    state: phase.to_string(),
                })
            }
        }

        self.notification = None;
        self.transition(FlowState::Capturing);

        if !self.camera.is_open() {
            if let Err(e) = self.camera.open(self.facing) {
                return Err(self.fail(capture_failure(e)));
            }
        }

        let photo = match self.camera.capture().await {
            Ok(photo) => photo,
            Err(e) => return Err(self.fail(capture_failure(e))),
        };
        tracing::info!(uri = %photo.uri, bytes = photo.bytes.len(), "photo captured");

        self.upload_and_classify(photo).await
    }

    pub async fn upload_and_classify(&mut self, photo: CapturedPhoto) -> Result<Verdict> {
        match self.state.phase() {
            Phase::Idle | Phase::Capturing => {}
            Phase::PermissionRequired => return Err(RiceError::PermissionDenied),
            phase => {
                return Err(RiceError::InvalidState {
                    operation: "upload".to_string(),
                    state: phase.to_string(),
                })
            }
        }

        self.notification = None;
        self.transition(FlowState::Uploading {
            photo: photo.clone(),
        });

        let result = match self.recognizer.recognize(&photo).await {
            Ok(result) => result,
            Err(e) => return Err(self.fail(e)),
        };

        let verdict = self.policy.interpret(result.scores());
        if verdict == Verdict::MultipleFacesUnsupported {
            return Err(self.fail(RiceError::UnsupportedCardinality {
                faces: result.faces(),
            }));
        }

        tracing::info!(
            faces = result.faces(),
            positives = result.positives(),
            ?verdict,
            "photo classified"
        );
        self.transition(FlowState::Displaying {
            photo,
            result,
            verdict,
        });
        Ok(verdict)
    }

    /// Back to the pre-capture state, whatever the current one is.
    pub fn clear(&mut self) {
        self.notification = None;
        let next = if self.permission.status().is_granted() {
            FlowState::Idle
        } else {
            self.camera.close();
            FlowState::PermissionRequired
        };
        self.transition(next);
    }

    fn bind_camera(&mut self) {
        if let Err(e) = self.camera.open(self.facing) {
            tracing::warn!(facing = %self.facing, "camera bind failed, will retry on capture: {}", e);
        }
    }

    fn fail(&mut self, err: RiceError) -> RiceError {
        tracing::error!(
            "capture session failed: {} (category: {:?})",
            err,
            err.category()
        );
        self.notification = Some(Notification::from(&err));
        self.transition(FlowState::Idle);
        err
    }

    fn transition(&mut self, next: FlowState) {
        tracing::debug!(from = %self.state.phase(), to = %next.phase(), "flow transition");
        self.state = next;
        self.publish();
    }

    fn publish(&self) {
        // No receivers is fine.
        let _ = self.snapshots.send(self.snapshot());
    }
}

impl<C: Camera, R: Recognizer, P: PermissionGate> Drop for CaptureAndClassifyFlow<C, R, P> {
    fn drop(&mut self) {
        self.camera.close();
    }
}

fn capture_failure(err: RiceError) -> RiceError {
    match err {
        RiceError::CaptureFailure { .. } => err,
        other => RiceError::CaptureFailure {
            message: other.to_string(),
        },
    }
}
