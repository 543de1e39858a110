//! Containers for the eight controllable upper body joints of the NAO.
/// Names of the controlled robot joints, in slot order.
pub const JOINT_NAMES: [&str; 8] = [
    "RShoulderPitch",
    "RShoulderRoll",
    "RElbowRoll",
    "RElbowYaw",
    "LShoulderPitch",
    "LShoulderRoll",
    "LElbowRoll",
    "LElbowYaw",
];

/// Wrapper struct containing the controlled joints of a single arm of the robot.
///
/// The wrist yaw and hand of the NAO are not driven by the retargeting, so they are left out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArmJoints<T> {
    pub shoulder_pitch: T,
    pub shoulder_roll: T,
    pub elbow_roll: T,
    pub elbow_yaw: T,
}

impl<T> ArmJoints<T> {
    /// Transforms each element in the [`ArmJoints`] using the provided closure `f`,
    /// producing a new [`ArmJoints`] with the transformed values.
    ///
    /// # Example
    ///
    /// ```
    /// use retarget::ArmJoints;
    ///
    /// let joints = ArmJoints::<u32>::default();
    ///
    /// let transformed = joints.map(|x| x + 1);
    /// assert_eq!(transformed.elbow_yaw, 1);
    /// ```
    pub fn map<F, U>(self, mut f: F) -> ArmJoints<U>
    where
        F: FnMut(T) -> U,
    {
        ArmJoints {
            shoulder_pitch: f(self.shoulder_pitch),
            shoulder_roll: f(self.shoulder_roll),
            elbow_roll: f(self.elbow_roll),
            elbow_yaw: f(self.elbow_yaw),
        }
    }

    /// Zips two [`ArmJoints`] instances element-wise, creating a new [`ArmJoints`]
    /// containing tuples of corresponding elements from the two arms.
    pub fn zip<U>(self, other: ArmJoints<U>) -> ArmJoints<(T, U)> {
        ArmJoints {
            shoulder_pitch: (self.shoulder_pitch, other.shoulder_pitch),
            shoulder_roll: (self.shoulder_roll, other.shoulder_roll),
            elbow_roll: (self.elbow_roll, other.elbow_roll),
            elbow_yaw: (self.elbow_yaw, other.elbow_yaw),
        }
    }

    /// Return an iterator over references to the elements of the [`ArmJoints`], in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        [
            &self.shoulder_pitch,
            &self.shoulder_roll,
            &self.elbow_roll,
            &self.elbow_yaw,
        ]
        .into_iter()
    }
}

impl<T: Clone> ArmJoints<T> {
    /// Creates an [`ArmJoints`] with every joint set to `value`.
    pub fn fill(value: T) -> Self {
        Self {
            shoulder_pitch: value.clone(),
            shoulder_roll: value.clone(),
            elbow_roll: value.clone(),
            elbow_yaw: value,
        }
    }
}

/// The controlled arm joints of both arms.
///
/// Slots are ordered right arm first, see [`JOINT_NAMES`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpperBodyJoints<T> {
    pub right_arm: ArmJoints<T>,
    pub left_arm: ArmJoints<T>,
}

impl<T> UpperBodyJoints<T> {
    /// Number of slots in an [`UpperBodyJoints`].
    pub const LEN: usize = JOINT_NAMES.len();

    /// Transforms each element using the provided closure `f`.
    ///
    /// # Example
    ///
    /// ```
    /// use retarget::UpperBodyJoints;
    ///
    /// let degrees = UpperBodyJoints::fill(90.0_f64);
    /// let radians = degrees.map(f64::to_radians);
    ///
    /// assert!(radians.iter().all(|r| (r - std::f64::consts::FRAC_PI_2).abs() < 1e-12));
    /// ```
    pub fn map<F, U>(self, mut f: F) -> UpperBodyJoints<U>
    where
        F: FnMut(T) -> U,
    {
        UpperBodyJoints {
            right_arm: self.right_arm.map(&mut f),
            left_arm: self.left_arm.map(&mut f),
        }
    }

    /// Zips two [`UpperBodyJoints`] instances element-wise.
    pub fn zip<U>(self, other: UpperBodyJoints<U>) -> UpperBodyJoints<(T, U)> {
        UpperBodyJoints {
            right_arm: self.right_arm.zip(other.right_arm),
            left_arm: self.left_arm.zip(other.left_arm),
        }
    }

    /// Return an iterator over references to all eight slots, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.right_arm.iter().chain(self.left_arm.iter())
    }

    /// Iterates the slots together with the name of the robot joint they drive.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, &T)> {
        JOINT_NAMES.into_iter().zip(self.iter())
    }

    /// Converts the joints into an array in slot order.
    pub fn into_array(self) -> [T; 8] {
        let UpperBodyJoints {
            right_arm: r,
            left_arm: l,
        } = self;

        [
            r.shoulder_pitch,
            r.shoulder_roll,
            r.elbow_roll,
            r.elbow_yaw,
            l.shoulder_pitch,
            l.shoulder_roll,
            l.elbow_roll,
            l.elbow_yaw,
        ]
    }
}

impl<T: Clone> UpperBodyJoints<T> {
    /// Creates an [`UpperBodyJoints`] with every slot set to `value`.
    pub fn fill(value: T) -> Self {
        Self {
            right_arm: ArmJoints::fill(value.clone()),
            left_arm: ArmJoints::fill(value),
        }
    }
}
