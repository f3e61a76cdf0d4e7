use serde::{Deserialize, Serialize};

/// Label offered for "no field" in a channel selector.
pub const NONE_CHOICE: &str = "NONE";

/// The number of output channels a decode pass can fill.
pub const CHANNEL_COUNT: usize = 5;

/// One field stored in a GeoDict file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// 1-based position of the field in the file.
    pub image_number: u32,
    /// The name given on the field's `Names` line, or empty.
    pub name: String,
    /// True if the header marks the field as a 3-component vector.
    pub is_vector: bool,
    pub(crate) read: bool,
}

impl FieldDescriptor {
    /// Creates an unnamed scalar field that has not been read.
    pub fn new(image_number: u32) -> Self {
        Self {
            image_number,
            ..Default::default()
        }
    }

    /// True once the field's data has been materialized in the current session.
    pub fn is_read(&self) -> bool {
        self.read
    }

    /// Number of components per voxel.
    pub fn components(&self) -> usize {
        if self.is_vector { 3 } else { 1 }
    }
}

/// The fields of a GeoDict file, in the order their data blocks appear in the payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldCatalog {
    pub(crate) fields: Vec<FieldDescriptor>,
}

impl FieldCatalog {
    /// The field descriptors in payload order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the header declared no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The first field with the given image number.
    pub fn get(&self, image_number: u32) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.image_number == image_number)
    }

    /// The first field with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Labels for a field selector: [`NONE_CHOICE`] followed by every field name in catalogue order.
    ///
    /// Position `k` of this list is the choice that [`ChannelAssignment::from_choices`] accepts.
    pub fn choice_labels(&self) -> Vec<String> {
        std::iter::once(NONE_CHOICE.to_string())
            .chain(self.fields.iter().map(|f| f.name.clone()))
            .collect()
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut FieldDescriptor> {
        self.fields.last_mut()
    }

    pub(crate) fn push(&mut self, field: FieldDescriptor) {
        self.fields.push(field);
    }
}

/// One of the five output slots a decode pass can fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Channel(u8);

impl Channel {
    /// All channels in id order.
    pub const ALL: [Channel; CHANNEL_COUNT] =
        [Channel(1), Channel(2), Channel(3), Channel(4), Channel(5)];

    /// Returns the channel with id `id` (1 through 5).
    pub fn new(id: u8) -> Option<Self> {
        (1..=CHANNEL_COUNT as u8).contains(&id).then_some(Self(id))
    }

    /// The channel id, 1 through 5.
    pub fn id(&self) -> u8 {
        self.0
    }

    pub(crate) fn index(&self) -> usize {
        self.0 as usize - 1
    }
}

/// Which field, by image number, each channel wants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAssignment {
    selections: [Option<u32>; CHANNEL_COUNT],
}

impl ChannelAssignment {
    /// Assigns image number `n` to channel `n` for every channel.
    pub fn sequential() -> Self {
        let mut assignment = Self::default();
        for channel in Channel::ALL {
            assignment.select(channel, Some(channel.id() as u32));
        }
        assignment
    }

    /// Builds an assignment from selector positions, one per channel.
    ///
    /// Position 0 means "none"; position `k` selects the `k`-th field of `catalog`.
    /// Positions past the end of the catalogue select nothing.
    pub fn from_choices(choices: [usize; CHANNEL_COUNT], catalog: &FieldCatalog) -> Self {
        let mut assignment = Self::default();
        for (channel, choice) in Channel::ALL.into_iter().zip(choices) {
            let selected = choice
                .checked_sub(1)
                .and_then(|position| catalog.fields().get(position))
                .map(|field| field.image_number);
            assignment.select(channel, selected);
        }
        assignment
    }

    /// Sets the image number wanted by `channel`.
    pub fn select(&mut self, channel: Channel, image_number: Option<u32>) -> &mut Self {
        self.selections[channel.index()] = image_number;
        self
    }

    /// The image number wanted by `channel`.
    pub fn selection(&self, channel: Channel) -> Option<u32> {
        self.selections[channel.index()]
    }

    /// The first channel, in id order, that selects `image_number`.
    pub fn first_channel_for(&self, image_number: u32) -> Option<Channel> {
        Channel::ALL
            .into_iter()
            .find(|&channel| self.selection(channel) == Some(image_number))
    }
}
